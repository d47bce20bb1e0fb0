use thiserror::Error;

use crate::core::credentials::CredentialKind;

/// Main error type for the joke generator
#[derive(Error, Debug)]
pub enum JokeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: please enter your {0}")]
    MissingCredential(CredentialKind),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Credential check unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Unknown joke source: {0}")]
    UnknownSource(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, JokeError>;

impl JokeError {
    /// Whether the message looks like a credential problem.
    ///
    /// The trigger shows an extra hint for these, so the check is made on the
    /// rendered message rather than the variant: provider errors often only
    /// say "Incorrect API key" inside an otherwise generic payload.
    pub fn is_auth_related(&self) -> bool {
        mentions_auth(&self.to_string())
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            JokeError::Config(_) => "CONFIG_ERROR",
            JokeError::MissingCredential(_) => "MISSING_CREDENTIAL",
            JokeError::InvalidCredential(_) => "INVALID_CREDENTIAL",
            JokeError::ProbeUnavailable(_) => "PROBE_UNAVAILABLE",
            JokeError::OpenAI(_) => "OPENAI_ERROR",
            JokeError::Http(_) => "HTTP_ERROR",
            JokeError::Serialization(_) => "SERIALIZATION_ERROR",
            JokeError::ToolExecution(_) => "TOOL_EXECUTION_ERROR",
            JokeError::UnknownSource(_) => "UNKNOWN_SOURCE",
            JokeError::Server(_) => "SERVER_ERROR",
            JokeError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "auth_related": self.is_auth_related()
            }
        })
    }
}

/// Case-insensitive check for "api key" or "authentication" in a message.
pub fn mentions_auth(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("api key") || lowered.contains("authentication")
}
