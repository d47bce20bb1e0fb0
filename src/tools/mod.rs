//! Tools module containing the tool abstraction and the joke sources

pub mod humor_api;
pub mod local;
pub mod tool;

pub use humor_api::HumorApiTool;
pub use local::LocalJokeTool;
pub use tool::{JokeParams, Tool, ToolFuture};

use crate::{
    config::{AppConfig, SourceKind},
    core::credentials::{CredentialKind, Credentials},
    JokeError, Result,
};

/// Build the joke tool for the configured source.
///
/// The remote tool carries its Humor API key, so the key must already be set.
pub fn build_tool(config: &AppConfig, credentials: &Credentials) -> Result<Box<dyn Tool>> {
    match config.source {
        SourceKind::Local => Ok(Box::new(LocalJokeTool::new())),
        SourceKind::Remote => {
            let api_key = credentials
                .humor_api_key()
                .ok_or(JokeError::MissingCredential(CredentialKind::HumorApi))?;
            let mut tool = HumorApiTool::new(api_key).with_base_url(&config.humor_base_url);
            if let Some(timeout) = config.timeout() {
                tool = tool.with_timeout(timeout)?;
            }
            Ok(Box::new(tool))
        }
    }
}
