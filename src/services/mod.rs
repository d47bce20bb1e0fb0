pub mod key_probe;

pub use key_probe::{KeyProbe, OpenAiKeyProbe, ProbeOutcome};
