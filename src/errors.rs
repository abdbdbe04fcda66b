use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing request body")]
    MissingBody,

    #[error("invalid JSON format")]
    InvalidJson,

    #[error("question is required")]
    QuestionRequired,

    #[error("failed to reach the generation service: {0}")]
    Generation(String),

    #[error("failed to reach the bot runtime: {0}")]
    Dialogue(String),

    #[error("failed to communicate with the bot runtime after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: usize, last_error: String },

    #[error("invalid response from bot runtime")]
    EmptyBotReply,
}

impl HandlerError {
    /// HTTP status this error maps to. Validation failures are 400, everything
    /// upstream-related is 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingBody | Self::InvalidJson | Self::QuestionRequired => 400,
            Self::Generation(_)
            | Self::Dialogue(_)
            | Self::RetryExhausted { .. }
            | Self::EmptyBotReply => 500,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.status_code() == 400
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(_: serde_json::Error) -> Self {
        HandlerError::InvalidJson
    }
}

// Generic implementation for AWS SDK request-builder errors
impl From<aws_sdk_bedrockagentruntime::error::BuildError> for HandlerError {
    fn from(error: aws_sdk_bedrockagentruntime::error::BuildError) -> Self {
        HandlerError::Generation(error.to_string())
    }
}
