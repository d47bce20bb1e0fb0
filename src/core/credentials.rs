use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::{
    config::SourceKind,
    error::JokeError,
    services::key_probe::{KeyProbe, ProbeOutcome},
};

/// Name of the environment variable provider clients read the OpenAI key from
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// A secret the generate action may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    OpenAi,
    HumorApi,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::OpenAi => f.write_str("OpenAI API key"),
            CredentialKind::HumorApi => f.write_str("Humor API key"),
        }
    }
}

/// Result of the last liveness probe for the OpenAI key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Verification {
    #[default]
    Unchecked,
    Accepted,
    Rejected(String),
    Unreachable(String),
}

impl From<ProbeOutcome> for Verification {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Accepted => Verification::Accepted,
            ProbeOutcome::Rejected(message) => Verification::Rejected(message),
            ProbeOutcome::Unreachable(message) => Verification::Unreachable(message),
        }
    }
}

/// Secrets held for the lifetime of a session; never persisted.
#[derive(Clone, Default)]
pub struct Credentials {
    openai_api_key: Option<String>,
    humor_api_key: Option<String>,
    verification: Verification,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("humor_api_key", &self.humor_api_key.as_ref().map(|_| "***"))
            .field("verification", &self.verification)
            .finish()
    }
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.set_openai_api_key(key);
        self
    }

    pub fn with_humor_api_key(mut self, key: impl Into<String>) -> Self {
        self.set_humor_api_key(key);
        self
    }

    /// Store the OpenAI key. A new key invalidates the previous probe verdict.
    pub fn set_openai_api_key(&mut self, key: impl Into<String>) {
        let key = non_empty(key);
        if key != self.openai_api_key {
            self.verification = Verification::Unchecked;
        }
        self.openai_api_key = key;
    }

    pub fn set_humor_api_key(&mut self, key: impl Into<String>) {
        self.humor_api_key = non_empty(key);
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }

    pub fn humor_api_key(&self) -> Option<&str> {
        self.humor_api_key.as_deref()
    }

    pub fn get(&self, kind: CredentialKind) -> Option<&str> {
        match kind {
            CredentialKind::OpenAi => self.openai_api_key(),
            CredentialKind::HumorApi => self.humor_api_key(),
        }
    }

    /// Forget every key and the probe verdict.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    pub fn set_verification(&mut self, verification: Verification) {
        self.verification = verification;
    }

    /// Run the probe against the stored OpenAI key and record the verdict.
    pub async fn verify_openai_key(&mut self, probe: &dyn KeyProbe) -> &Verification {
        self.verification = match self.openai_api_key.as_deref() {
            Some(key) => probe.probe(key).await.into(),
            None => Verification::Unchecked,
        };
        &self.verification
    }

    /// Publish the OpenAI key to the process environment for provider clients.
    ///
    /// Called once at startup before any request is served; keys entered in
    /// the web form stay in the session.
    pub fn export_openai_api_key(&self) {
        if let Some(key) = self.openai_api_key.as_deref() {
            std::env::set_var(OPENAI_API_KEY_ENV, key);
            info!("OpenAI API key exported to {}", OPENAI_API_KEY_ENV);
        }
    }
}

/// Why the generate action is unreachable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// A required secret is empty
    Missing(CredentialKind),
    /// The probe has not run yet for the current key
    Unverified,
    /// The provider refused the key
    Rejected(String),
    /// The provider could not be reached to check the key
    Unreachable(String),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Missing(kind) => write!(f, "Please enter your {} to continue.", kind),
            BlockReason::Unverified => f.write_str("Please submit your OpenAI API key to verify it."),
            BlockReason::Rejected(message) => write!(f, "Invalid OpenAI API key: {}", message),
            BlockReason::Unreachable(message) => write!(
                f,
                "Could not reach OpenAI to verify your API key ({}). Please try again.",
                message
            ),
        }
    }
}

impl From<BlockReason> for JokeError {
    fn from(reason: BlockReason) -> Self {
        match reason {
            BlockReason::Missing(kind) => JokeError::MissingCredential(kind),
            BlockReason::Unverified => {
                JokeError::InvalidCredential("OpenAI API key has not been verified".to_string())
            }
            BlockReason::Rejected(message) => JokeError::InvalidCredential(message),
            BlockReason::Unreachable(message) => JokeError::ProbeUnavailable(message),
        }
    }
}

/// Gate verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    Ready,
    Blocked(BlockReason),
}

impl GateStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, GateStatus::Ready)
    }

    pub fn into_result(self) -> Result<(), JokeError> {
        match self {
            GateStatus::Ready => Ok(()),
            GateStatus::Blocked(reason) => Err(reason.into()),
        }
    }
}

/// Decides whether the generate action is reachable for a joke source
#[derive(Debug, Clone, Copy)]
pub struct CredentialGate {
    source: SourceKind,
}

impl CredentialGate {
    pub fn new(source: SourceKind) -> Self {
        Self { source }
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Secrets the source needs, in the order they are asked for
    pub fn required(&self) -> &'static [CredentialKind] {
        match self.source {
            SourceKind::Local => &[CredentialKind::OpenAi],
            SourceKind::Remote => &[CredentialKind::OpenAi, CredentialKind::HumorApi],
        }
    }

    /// Only the remote source verifies the OpenAI key with a probe.
    pub fn requires_probe(&self) -> bool {
        self.source == SourceKind::Remote
    }

    pub fn evaluate(&self, credentials: &Credentials) -> GateStatus {
        if let Some(kind) = self
            .required()
            .iter()
            .copied()
            .find(|kind| credentials.get(*kind).is_none())
        {
            return GateStatus::Blocked(BlockReason::Missing(kind));
        }

        if !self.requires_probe() {
            return GateStatus::Ready;
        }

        match credentials.verification() {
            Verification::Accepted => GateStatus::Ready,
            Verification::Unchecked => GateStatus::Blocked(BlockReason::Unverified),
            Verification::Rejected(message) => {
                GateStatus::Blocked(BlockReason::Rejected(message.clone()))
            }
            Verification::Unreachable(message) => {
                warn!("Credential probe unreachable: {}", message);
                GateStatus::Blocked(BlockReason::Unreachable(message.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedProbe(ProbeOutcome);

    #[async_trait]
    impl KeyProbe for FixedProbe {
        async fn probe(&self, _api_key: &str) -> ProbeOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_blank_keys_are_treated_as_missing() {
        let credentials = Credentials::new().with_openai_api_key("   ");
        assert!(credentials.openai_api_key().is_none());

        let gate = CredentialGate::new(SourceKind::Local);
        assert_eq!(
            gate.evaluate(&credentials),
            GateStatus::Blocked(BlockReason::Missing(CredentialKind::OpenAi))
        );
    }

    #[test]
    fn test_local_gate_opens_with_openai_key() {
        let credentials = Credentials::new().with_openai_api_key("sk-test");
        assert!(CredentialGate::new(SourceKind::Local)
            .evaluate(&credentials)
            .is_ready());
    }

    #[test]
    fn test_remote_gate_needs_both_keys() {
        let gate = CredentialGate::new(SourceKind::Remote);
        let credentials = Credentials::new().with_openai_api_key("sk-test");
        assert_eq!(
            gate.evaluate(&credentials),
            GateStatus::Blocked(BlockReason::Missing(CredentialKind::HumorApi))
        );

        let credentials = credentials.with_humor_api_key("humor");
        assert_eq!(
            gate.evaluate(&credentials),
            GateStatus::Blocked(BlockReason::Unverified)
        );
    }

    #[tokio::test]
    async fn test_remote_gate_follows_probe_verdict() {
        let gate = CredentialGate::new(SourceKind::Remote);
        let mut credentials = Credentials::new()
            .with_openai_api_key("sk-test")
            .with_humor_api_key("humor");

        credentials
            .verify_openai_key(&FixedProbe(ProbeOutcome::Rejected("bad key".into())))
            .await;
        assert_eq!(
            gate.evaluate(&credentials),
            GateStatus::Blocked(BlockReason::Rejected("bad key".into()))
        );

        credentials
            .verify_openai_key(&FixedProbe(ProbeOutcome::Unreachable("timeout".into())))
            .await;
        assert!(matches!(
            gate.evaluate(&credentials),
            GateStatus::Blocked(BlockReason::Unreachable(_))
        ));

        credentials
            .verify_openai_key(&FixedProbe(ProbeOutcome::Accepted))
            .await;
        assert!(gate.evaluate(&credentials).is_ready());
    }

    #[test]
    fn test_block_reasons_map_to_errors() {
        let err: JokeError = BlockReason::Rejected("bad key".into()).into();
        assert_eq!(err.error_code(), "INVALID_CREDENTIAL");

        let err = GateStatus::Blocked(BlockReason::Unreachable("timeout".into()))
            .into_result()
            .unwrap_err();
        assert_eq!(err.error_code(), "PROBE_UNAVAILABLE");
        assert!(GateStatus::Ready.into_result().is_ok());
    }

    #[test]
    fn test_new_key_resets_verification() {
        let mut credentials = Credentials::new().with_openai_api_key("sk-one");
        credentials.set_verification(Verification::Accepted);

        credentials.set_openai_api_key("sk-one");
        assert_eq!(credentials.verification(), &Verification::Accepted);

        credentials.set_openai_api_key("sk-two");
        assert_eq!(credentials.verification(), &Verification::Unchecked);
    }

    #[test]
    fn test_clear_forgets_keys_and_verdict() {
        let mut credentials = Credentials::new()
            .with_openai_api_key("sk-one")
            .with_humor_api_key("humor");
        credentials.set_verification(Verification::Accepted);

        credentials.clear();
        assert!(credentials.openai_api_key().is_none());
        assert!(credentials.humor_api_key().is_none());
        assert_eq!(credentials.verification(), &Verification::Unchecked);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new()
            .with_openai_api_key("sk-secret")
            .with_humor_api_key("humor-secret");
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }
}
