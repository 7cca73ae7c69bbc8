use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::{ChatError, PipelineError};

const RETRYABLE_STATUSES: [u16; 3] = [429, 500, 503];
const RETRYABLE_MARKERS: [&str; 8] = [
    "429",
    "rate",
    "overloaded",
    "500",
    "503",
    "resource_exhausted",
    "quota",
    "too many",
];
const RATE_LIMIT_MARKERS: [&str; 5] = ["429", "rate", "resource_exhausted", "quota", "too many"];

/// Wall-clock budget for one analyze run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    /// Remaining budget, or `Timeout` when nothing is left for another call.
    pub fn ensure_remaining(&self) -> Result<Duration, PipelineError> {
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Err(PipelineError::Timeout(self.budget));
        }
        Ok(remaining)
    }

    /// Sleeps for `wait` unless that would use up the remaining budget.
    pub fn sleep(&self, wait: Duration) -> Result<(), PipelineError> {
        if wait.is_zero() {
            return Ok(());
        }
        if wait >= self.remaining() {
            return Err(PipelineError::Timeout(self.budget));
        }
        thread::sleep(wait);
        Ok(())
    }
}

pub fn is_retryable(err: &ChatError) -> bool {
    if err
        .status()
        .is_some_and(|status| RETRYABLE_STATUSES.contains(&status))
    {
        return true;
    }
    message_has_marker(err, &RETRYABLE_MARKERS)
}

pub fn is_rate_limit(err: &ChatError) -> bool {
    err.status() == Some(429) || message_has_marker(err, &RATE_LIMIT_MARKERS)
}

fn message_has_marker(err: &ChatError, markers: &[&str]) -> bool {
    let message = err.to_string().to_lowercase();
    markers.iter().any(|marker| message.contains(marker))
}

/// Runs `call` with the remaining budget as its timeout, retrying transient
/// failures with exponential backoff.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    deadline: &Deadline,
    label: &str,
    mut call: F,
) -> Result<T, PipelineError>
where
    F: FnMut(Duration) -> Result<T, ChatError>,
{
    let mut attempt = 0u32;
    loop {
        let timeout = deadline.ensure_remaining()?;
        let err = match call(timeout) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if let ChatError::Transport(transport) = &err {
            if transport.is_timeout() && deadline.remaining().is_zero() {
                return Err(PipelineError::Timeout(deadline.budget()));
            }
        }

        if !is_retryable(&err) || attempt >= policy.max_retries {
            return Err(give_up(err, attempt + 1));
        }

        let wait = policy.delay_for(attempt);
        warn!(
            call = label,
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            wait_ms = wait.as_millis() as u64,
            error = %err,
            "model call failed, retrying"
        );
        deadline.sleep(wait)?;
        attempt += 1;
    }
}

fn give_up(err: ChatError, attempts: u32) -> PipelineError {
    if is_rate_limit(&err) {
        PipelineError::RateLimited {
            attempts,
            source: err,
        }
    } else {
        PipelineError::Upstream {
            attempts,
            source: err,
        }
    }
}
