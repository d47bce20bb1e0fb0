use serde::Serialize;
use serde_json::json;
use std::time::Instant;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    core::credentials::{BlockReason, CredentialGate, Credentials, GateStatus},
    error::{JokeError, Result},
    tools::{build_tool, Tool},
};

/// Hint shown under errors that look like a credential problem
pub const AUTH_HINT: &str =
    "There might be an issue with your OpenAI API key. Please check if it's valid.";

/// Severity of a displayed status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Success,
    Warning,
    Error,
}

impl Banner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Banner::Success => "success",
            Banner::Warning => "warning",
            Banner::Error => "error",
        }
    }

    /// CSS class the banner is rendered with
    pub fn css_class(&self) -> &'static str {
        match self {
            Banner::Success => "banner-success",
            Banner::Warning => "banner-warning",
            Banner::Error => "banner-error",
        }
    }
}

/// A message and the banner it is shown in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub banner: Banner,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            banner: Banner::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            banner: Banner::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            banner: Banner::Error,
            message: message.into(),
        }
    }
}

impl From<&BlockReason> for Notice {
    fn from(reason: &BlockReason) -> Self {
        match reason {
            BlockReason::Missing(_) | BlockReason::Unverified | BlockReason::Unreachable(_) => {
                Notice::warning(reason.to_string())
            }
            BlockReason::Rejected(_) => Notice::error(reason.to_string()),
        }
    }
}

/// Outcome of one press of the generate button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub category: String,
    pub notices: Vec<Notice>,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        self.notices
            .first()
            .map(|notice| notice.banner == Banner::Success)
            .unwrap_or(false)
    }

    /// The joke text, when generation succeeded
    pub fn joke(&self) -> Option<&str> {
        self.notices
            .first()
            .filter(|notice| notice.banner == Banner::Success)
            .map(|notice| notice.message.as_str())
    }

    fn blocked(category: &str, reason: &BlockReason) -> Self {
        Self {
            category: category.to_string(),
            notices: vec![Notice::from(reason)],
        }
    }

    fn failed(category: &str, error: &JokeError) -> Self {
        let mut notices = vec![Notice::error(format!("An error occurred: {}", error))];
        if error.is_auth_related() {
            notices.push(Notice::warning(AUTH_HINT));
        }
        Self {
            category: category.to_string(),
            notices,
        }
    }
}

/// Drives a single generation: gate check, then one direct tool call.
#[derive(Debug, Clone)]
pub struct JokeGenerator {
    config: AppConfig,
}

impl JokeGenerator {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn gate(&self) -> CredentialGate {
        CredentialGate::new(self.config.source)
    }

    /// Run the tool for a category, propagating failures.
    pub async fn generate(&self, credentials: &Credentials, category: &str) -> Result<String> {
        self.gate().evaluate(credentials).into_result()?;
        let tool = build_tool(&self.config, credentials)?;
        run_tool(tool.as_ref(), category).await
    }

    /// Handle the generate action and turn every outcome into banners.
    pub async fn trigger(&self, credentials: &Credentials, category: &str) -> Generation {
        if let GateStatus::Blocked(reason) = self.gate().evaluate(credentials) {
            warn!("Generate blocked: {}", reason);
            return Generation::blocked(category, &reason);
        }

        match self.generate(credentials, category).await {
            Ok(joke) => Generation {
                category: category.to_string(),
                notices: vec![Notice::success(joke)],
            },
            Err(err) => {
                warn!("Joke generation failed: {}", err);
                Generation::failed(category, &err)
            }
        }
    }
}

/// Invoke one tool with a category argument
pub async fn run_tool(tool: &dyn Tool, category: &str) -> Result<String> {
    let start = Instant::now();
    let joke = tool.execute(json!({ "category": category })).await?;
    info!(
        "Tool {} produced a joke for '{}' in {:?}",
        tool.name(),
        category,
        start.elapsed()
    );
    Ok(joke)
}
