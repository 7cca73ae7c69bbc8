use std::time::Duration;

use crate::cli::{InputArgs, ModelArgs};
use crate::error::PipelineError;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_COOLDOWN_MS: u64 = 3_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Limits applied to a document before ingestion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_file_bytes: u64,
    pub min_text_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }
}

impl From<&InputArgs> for InputLimits {
    fn from(args: &InputArgs) -> Self {
        Self {
            max_file_bytes: args.max_file_bytes,
            min_text_chars: args.min_text_chars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Wait before the retry that follows failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

/// Settings for the model-backed part of the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub model: String,
    pub retry: RetryPolicy,
    pub cooldown: Duration,
    pub request_budget: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            request_budget: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AnalysisConfig {
    pub fn from_args(args: &ModelArgs) -> Self {
        Self {
            model: args.model.clone(),
            retry: RetryPolicy {
                max_retries: args.max_retries,
                ..RetryPolicy::default()
            },
            cooldown: Duration::from_millis(args.cooldown_ms),
            request_budget: Duration::from_secs(args.timeout_secs),
        }
    }
}

/// Endpoint and credentials for the hosted model.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn from_args(args: &ModelArgs) -> Result<Self, PipelineError> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PipelineError::Config(
                    "GROQ_API_KEY environment variable (or --api-key) is required".to_string(),
                )
            })?;

        Ok(Self {
            base_url: args.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}
