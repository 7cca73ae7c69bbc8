use std::time::Duration;

use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str =
    "AI API rate limit reached. Please wait 1-2 minutes and try again.";

/// Errors from the clause builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("No meaningful clauses could be extracted from the document")]
    NoMeaningfulClauses,
}

/// Errors from a single chat-completion request.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned no message content")]
    EmptyContent,
}

impl ChatError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Transport(err) => err.status().map(|status| status.as_u16()),
            ChatError::Status { status, .. } => Some(*status),
            ChatError::EmptyContent => None,
        }
    }
}

/// Terminal failures of one pipeline run. Every variant maps to a single
/// user-facing message; there is no partial result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("PDF ingestion failed: {0}")]
    Ingestion(String),

    #[error(transparent)]
    Chunking(#[from] ChunkError),

    #[error("model rate limit persisted after {attempts} attempt(s)")]
    RateLimited {
        attempts: u32,
        #[source]
        source: ChatError,
    },

    #[error("model request failed after {attempts} attempt(s)")]
    Upstream {
        attempts: u32,
        #[source]
        source: ChatError,
    },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("analysis exceeded the {}s request budget", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    /// HTTP-style status used in the failure envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::InvalidInput(_) => 400,
            PipelineError::RateLimited { .. } => 429,
            PipelineError::Timeout(_) => 504,
            PipelineError::Config(_)
            | PipelineError::Ingestion(_)
            | PipelineError::Chunking(_)
            | PipelineError::Upstream { .. }
            | PipelineError::MalformedResponse(_)
            | PipelineError::Internal(_) => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PipelineError::RateLimited { .. } => RATE_LIMIT_MESSAGE.to_string(),
            PipelineError::Upstream { source, .. } => format!("{self}: {source}"),
            other => other.to_string(),
        }
    }

    /// Short stage name recorded in run manifests.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) | PipelineError::Config(_) => "input",
            PipelineError::Ingestion(_) => "ingest",
            PipelineError::Chunking(_) => "chunk",
            PipelineError::RateLimited { .. }
            | PipelineError::Upstream { .. }
            | PipelineError::MalformedResponse(_) => "model",
            PipelineError::Timeout(_) => "deadline",
            PipelineError::Internal(_) => "internal",
        }
    }
}
