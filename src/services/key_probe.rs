use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::mentions_auth;

/// Default OpenAI API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Verdict of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The provider accepted the key
    Accepted,
    /// The provider answered and refused the key
    Rejected(String),
    /// The provider could not be reached; the key is neither good nor bad
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProbeOutcome::Accepted)
    }
}

/// A trivial authenticated call used to check a credential
#[async_trait]
pub trait KeyProbe: Send + Sync + std::fmt::Debug {
    async fn probe(&self, api_key: &str) -> ProbeOutcome;
}

/// Probes an OpenAI key by listing models
#[derive(Debug, Clone)]
pub struct OpenAiKeyProbe {
    base_url: String,
}

impl Default for OpenAiKeyProbe {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAI_BASE_URL)
    }
}

impl OpenAiKeyProbe {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl KeyProbe for OpenAiKeyProbe {
    async fn probe(&self, api_key: &str) -> ProbeOutcome {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(self.base_url.trim_end_matches('/'));
        // One attempt only: the client otherwise retries rate limits for minutes.
        let client = Client::with_config(config).with_backoff(single_attempt());

        debug!("Probing OpenAI key against {}", self.base_url);
        match client.models().list().await {
            Ok(_) => {
                info!("OpenAI key accepted");
                ProbeOutcome::Accepted
            }
            Err(err) => {
                let outcome = classify_probe_error(err);
                match &outcome {
                    ProbeOutcome::Rejected(_) => warn!("OpenAI key rejected by provider"),
                    _ => warn!("OpenAI key probe failed: {:?}", outcome),
                }
                outcome
            }
        }
    }
}

fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

/// Only an authentication error from the provider counts as a rejection.
fn classify_probe_error(err: OpenAIError) -> ProbeOutcome {
    match err {
        OpenAIError::ApiError(api_error) if is_auth_error(&api_error) => {
            ProbeOutcome::Rejected(api_error.message)
        }
        OpenAIError::ApiError(api_error) => ProbeOutcome::Unreachable(api_error.message),
        other => ProbeOutcome::Unreachable(other.to_string()),
    }
}

fn is_auth_error(api_error: &ApiError) -> bool {
    // ApiError is not Serialize in async-openai 0.14; mirror its fields.
    let value = serde_json::json!({
        "message": api_error.message,
        "type": api_error.r#type,
        "param": api_error.param,
        "code": api_error.code,
    });
    let kind = str_field(&value, "type");

    matches!(str_field(&value, "code"), "invalid_api_key" | "invalid_organization")
        || kind == "authentication_error"
        || (kind == "invalid_request_error" && mentions_auth(&api_error.message))
}

fn str_field<'a>(value: &'a serde_json::Value, name: &str) -> &'a str {
    value.get(name).and_then(|v| v.as_str()).unwrap_or_default()
}
