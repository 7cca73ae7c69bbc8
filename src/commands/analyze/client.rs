use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ChatError, PipelineError};

/// One system + user exchange with a JSON-only answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub user: String,
}

/// Chat-completion backend. `timeout` bounds the single request.
pub trait ChatClient {
    fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<String, ChatError>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct HttpChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpChatClient {
    pub fn new(config: &ClientConfig) -> Result<Self, PipelineError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|err| PipelineError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [WireMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient for HttpChatClient {
    fn complete(&self, request: &ChatRequest, timeout: Duration) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionBody {
            model: &request.model,
            temperature: request.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyContent)
    }
}
