use tracing::{debug, info};

use super::client::{ChatClient, ChatRequest};
use super::retry::{Deadline, with_retry};
use crate::config::AnalysisConfig;
use crate::error::{ChatError, PipelineError};

/// Model access shared by the analysis and summary stages of one run.
pub struct ModelSession<'a> {
    client: &'a dyn ChatClient,
    config: &'a AnalysisConfig,
    deadline: Deadline,
}

impl<'a> ModelSession<'a> {
    pub fn new(client: &'a dyn ChatClient, config: &'a AnalysisConfig) -> Self {
        Self {
            client,
            config,
            deadline: Deadline::start(config.request_budget),
        }
    }

    pub fn request(&self, temperature: f32, system: &str, user: String) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature,
            system: system.to_string(),
            user,
        }
    }

    /// Sends `request` under the retry policy. `label` names the stage in
    /// logs and in the empty-response error.
    pub fn complete(&self, request: &ChatRequest, label: &str) -> Result<String, PipelineError> {
        debug!(
            call = label,
            model = %request.model,
            prompt_chars = request.user.chars().count(),
            "sending model request"
        );

        let content = with_retry(&self.config.retry, &self.deadline, label, |timeout| {
            self.client.complete(request, timeout)
        });

        match content {
            Ok(content) if !content.trim().is_empty() => Ok(content),
            Ok(_)
            | Err(PipelineError::Upstream {
                source: ChatError::EmptyContent,
                ..
            }) => Err(PipelineError::MalformedResponse(format!(
                "Empty response from {label} model"
            ))),
            Err(err) => Err(err),
        }
    }

    pub fn cool_down(&self) -> Result<(), PipelineError> {
        let cooldown = self.config.cooldown;
        if !cooldown.is_zero() {
            info!(cooldown_ms = cooldown.as_millis() as u64, "cooling down between model calls");
        }
        self.deadline.sleep(cooldown)
    }
}
