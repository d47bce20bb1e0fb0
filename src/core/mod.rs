pub mod credentials;
pub mod generator;

pub use credentials::{
    BlockReason, CredentialGate, CredentialKind, Credentials, GateStatus, Verification,
};
pub use generator::{run_tool, Banner, Generation, JokeGenerator, Notice, AUTH_HINT};
