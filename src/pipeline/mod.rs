//! The cyclic analysis pipeline.
//!
//! A fixed number of outer cycles, each an inner planner/executor loop that
//! ends in a persisted markdown report; a senior review between cycles sets
//! the next directive; a finalizer synthesizes everything at the end.

pub mod cycle;
pub mod event;
pub mod prompts;
pub mod workflow;

pub use cycle::{CycleLog, CycleRunner, TurnRecord};
pub use event::{CollectingSink, EventSink, NullSink, ProgressEvent};
pub use workflow::AnalysisWorkflow;
