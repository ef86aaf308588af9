//! Script execution and the bounded correction loop.

pub mod corrector;
pub mod script;

pub use corrector::{CorrectionResult, Corrector, ExecutionAttempt};
pub use script::{ExecOutcome, ScriptRunner};
