use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    core::{credentials::GateStatus, Credentials, JokeGenerator},
    services::key_probe::{KeyProbe, OpenAiKeyProbe},
};

/// Shared state behind the web form.
///
/// The form serves a single user, so one credentials slot is the session.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<JokeGenerator>,
    pub probe: Arc<dyn KeyProbe>,
    credentials: Arc<RwLock<Credentials>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let probe = OpenAiKeyProbe::new(config.openai_base_url.clone());
        Self::with_probe(config, Arc::new(probe))
    }

    pub fn with_probe(config: AppConfig, probe: Arc<dyn KeyProbe>) -> Self {
        Self {
            generator: Arc::new(JokeGenerator::new(config)),
            probe,
            credentials: Arc::new(RwLock::new(Credentials::new())),
        }
    }

    /// Seed the session, e.g. with keys taken from the environment
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(credentials)),
            ..self
        }
    }

    pub fn credentials(&self) -> &Arc<RwLock<Credentials>> {
        &self.credentials
    }

    pub async fn gate_status(&self) -> GateStatus {
        let credentials = self.credentials.read().await;
        self.generator.gate().evaluate(&credentials)
    }
}
