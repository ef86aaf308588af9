//! Typed progress events emitted by the workflows.
//!
//! The pipeline narrates every step through an `EventSink` so the core
//! stays free of console concerns; the binary installs a colored console
//! sink, tests install a collecting sink.

use std::path::PathBuf;

/// One human-meaningful step of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// An outer cycle began
    CycleStarted { cycle: u32, total: u32 },

    /// An inner planner/executor iteration began
    IterationStarted { cycle: u32, iteration: u32, total: u32 },

    /// The planner's reasoning span
    PlannerReasoning { text: String },

    /// The planner's executable directive
    PlannerDirective { code: String },

    /// Planner produced no directive; execution skipped for this iteration
    DirectiveSkipped { cycle: u32, iteration: u32 },

    /// The planner signaled the cycle is finished
    FinishSignaled { cycle: u32, iteration: u32 },

    /// One execution attempt completed
    ExecutionAttempted {
        attempt: u32,
        succeeded: bool,
        output: String,
    },

    /// A correction was requested from the model after a failed attempt
    CorrectionRequested { attempt: u32 },

    /// All correction attempts were consumed; the last error is carried verbatim
    CorrectionExhausted { attempts: u32, last_error: String },

    /// New files appeared in the output directory
    ArtifactsCreated { images: Vec<PathBuf>, other: Vec<PathBuf> },

    /// A cycle report was durably written
    ReportWritten { cycle: u32, path: PathBuf },

    /// The reporting call produced no durable report; a sentinel was substituted
    HandoffFailed { cycle: u32, reason: String },

    /// The senior review produced the next cycle's directive
    SeniorDirective { text: String },

    /// The final synthesis report was written
    FinalReportWritten { path: PathBuf },

    /// A review-crew specialist began work
    SpecialistStarted { domain: String },

    /// A review-crew specialist report was saved
    SpecialistFinished { domain: String, path: PathBuf },

    /// The review-crew synthesis report was saved
    SynthesisFinished { path: PathBuf },

    /// The editorial decision
    DecisionMade { publish: bool, path: PathBuf },
}

/// Consumer of progress events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Sink that discards every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Sink that records events for inspection in tests
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_discards() {
        let sink = NullSink;
        sink.emit(ProgressEvent::CycleStarted { cycle: 1, total: 5 });
    }

    #[test]
    fn test_collecting_sink_records_in_order() {
        let sink = CollectingSink::new();
        sink.emit(ProgressEvent::CycleStarted { cycle: 1, total: 5 });
        sink.emit(ProgressEvent::IterationStarted {
            cycle: 1,
            iteration: 0,
            total: 5,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ProgressEvent::CycleStarted { cycle: 1, total: 5 });
    }

    #[test]
    fn test_sink_is_object_safe() {
        let sink: Box<dyn EventSink> = Box::new(NullSink);
        sink.emit(ProgressEvent::SeniorDirective {
            text: "continue".to_string(),
        });
    }
}
