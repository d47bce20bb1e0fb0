//! joke-agent-rs: a tiny joke generator behind a web form
//!
//! A joke comes from one of two tools: a fixed local joke table, or the Humor
//! API over HTTP. Credentials are held per session and gate the generate
//! action; the generator calls the selected tool directly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use joke_agent_rs::{AppConfig, Credentials, JokeGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = Credentials::new().with_openai_api_key("sk-...");
//!     let generator = JokeGenerator::new(AppConfig::default());
//!
//!     let generation = generator.trigger(&credentials, "programming").await;
//!     if let Some(joke) = generation.joke() {
//!         println!("{}", joke);
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod tools;
pub mod web;

pub use config::{AppConfig, SourceKind};
pub use core::{
    Banner, CredentialGate, CredentialKind, Credentials, GateStatus, Generation, JokeGenerator,
    Notice,
};
pub use error::{JokeError, Result};
pub use services::{KeyProbe, OpenAiKeyProbe, ProbeOutcome};
pub use tools::{HumorApiTool, LocalJokeTool, Tool};

#[cfg(feature = "cli")]
pub mod cli;
