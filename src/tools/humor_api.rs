use super::tool::{JokeParams, Tool, ToolFuture};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Humor API endpoint
pub const DEFAULT_HUMOR_API_BASE_URL: &str = "https://api.humorapi.com";

/// Prefix of every failure string returned by [`HumorApiTool`]
pub const ERROR_PREFIX: &str = "Error generating joke: ";

/// Body returned by `/jokes/random`
#[derive(Debug, Deserialize)]
pub struct HumorApiJoke {
    pub joke: String,
}

/// Tool that fetches a random joke from the Humor API
#[derive(Debug, Clone)]
pub struct HumorApiTool {
    api_key: String,
    base_url: String,
    client: Client,
}

impl HumorApiTool {
    /// Create a new tool using the provided API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_HUMOR_API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Build the tool using the `HUMOR_API_KEY` environment variable
    pub fn from_env() -> Result<Self, crate::JokeError> {
        let api_key = std::env::var("HUMOR_API_KEY")
            .map_err(|_| crate::JokeError::Config("Missing HUMOR_API_KEY env var".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply a request timeout; the client default is used otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, crate::JokeError> {
        self.client = Client::builder().timeout(timeout).build().map_err(|err| {
            crate::JokeError::Config(format!("Failed to build HTTP client: {}", err))
        })?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a joke, folding every failure into an error string.
    pub async fn fetch_joke(&self, category: &str) -> String {
        match self.try_fetch_joke(category).await {
            Ok(joke) => joke,
            Err(err) => {
                // The request URL carries the api-key query parameter.
                let err = err.without_url();
                warn!("Humor API request failed: {}", err);
                format!("{}{}", ERROR_PREFIX, err)
            }
        }
    }

    async fn try_fetch_joke(&self, category: &str) -> Result<String, reqwest::Error> {
        let url = build_random_joke_url(&self.base_url);
        debug!("GET {} (category: {})", url, category);

        let response = self
            .client
            .get(&url)
            .query(&[("api-key", self.api_key.as_str()), ("category", category)])
            .send()
            .await?
            .error_for_status()?;

        let body: HumorApiJoke = response.json().await?;
        Ok(body.joke)
    }
}

impl Tool for HumorApiTool {
    fn name(&self) -> &'static str {
        "humor_api_joke"
    }

    fn description(&self) -> &'static str {
        "Fetch a random joke for a category from the Humor API"
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params = JokeParams::from_value(parameters)?;
            Ok(self.fetch_joke(&params.category).await)
        })
    }
}

fn build_random_joke_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/jokes/random") {
        trimmed.to_string()
    } else {
        format!("{}/jokes/random", trimmed)
    }
}
