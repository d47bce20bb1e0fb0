use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{JokeError, Result};
use crate::services::key_probe::DEFAULT_OPENAI_BASE_URL;
use crate::tools::humor_api::DEFAULT_HUMOR_API_BASE_URL;

/// Which joke source backs the generate action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Fixed in-memory joke table
    #[default]
    Local,
    /// Humor API over HTTP
    Remote,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Remote => "remote",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = JokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(SourceKind::Local),
            "remote" | "humorapi" => Ok(SourceKind::Remote),
            other => Err(JokeError::UnknownSource(other.to_string())),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceKind,

    #[serde(default = "default_humor_base_url")]
    pub humor_base_url: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Outbound request timeout in seconds; `None` keeps the client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_humor_base_url() -> String {
    DEFAULT_HUMOR_API_BASE_URL.to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            humor_base_url: default_humor_base_url(),
            openai_base_url: default_openai_base_url(),
            host: default_host(),
            port: default_port(),
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(source) = std::env::var("JOKE_SOURCE") {
            config.source = source.parse()?;
        }
        if let Ok(url) = std::env::var("HUMOR_API_BASE_URL") {
            config.humor_base_url = url;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.openai_base_url = url;
        }
        if let Ok(host) = std::env::var("JOKE_AGENT_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("JOKE_AGENT_PORT") {
            config.port = port
                .parse()
                .map_err(|e| JokeError::Config(format!("Invalid JOKE_AGENT_PORT: {}", e)))?;
        }
        if let Ok(secs) = std::env::var("JOKE_AGENT_TIMEOUT_SECS") {
            let secs = secs.parse().map_err(|e| {
                JokeError::Config(format!("Invalid JOKE_AGENT_TIMEOUT_SECS: {}", e))
            })?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_humor_base_url(mut self, url: impl Into<String>) -> Self {
        self.humor_base_url = url.into();
        self
    }

    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| JokeError::Config(format!("Invalid listen address: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.source, SourceKind::Local);
        assert_eq!(config.port, 8501);
        assert!(config.timeout().is_none());
        assert_eq!(config.humor_base_url, "https://api.humorapi.com");
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::new()
            .with_source(SourceKind::Remote)
            .with_host("0.0.0.0")
            .with_port(8080)
            .with_timeout_secs(Some(5));

        assert_eq!(config.source, SourceKind::Remote);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("Remote".parse::<SourceKind>().unwrap(), SourceKind::Remote);
        assert_eq!(" local ".parse::<SourceKind>().unwrap(), SourceKind::Local);
        assert!("crew".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"source": "remote"}"#).unwrap();
        assert_eq!(config.source, SourceKind::Remote);
        assert_eq!(config.host, "127.0.0.1");
    }
}
