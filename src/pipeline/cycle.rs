//! One outer cycle: the planner/executor inner loop plus the reporting call.

use std::path::Path;

use log::{info, warn};

use crate::artifacts::{self, NewArtifacts};
use crate::config::WorkflowConfig;
use crate::context::{CycleHistory, PlannerContext};
use crate::directive::parse_directive;
use crate::error::{CadreError, Result};
use crate::exec::{CorrectionResult, Corrector, ScriptRunner};
use crate::llm::{CompletionRequest, LlmClient};
use crate::pipeline::event::{EventSink, ProgressEvent};
use crate::pipeline::prompts::{PLANNER_SYSTEM_PROMPT, REPORTER_SYSTEM_PROMPT};
use crate::report::{persist_cycle_report, CycleReport};

/// One completed planner/executor turn, kept for the reporting call
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub directive: String,
    pub result: String,
    pub artifacts: NewArtifacts,
}

/// Structured log of everything that happened inside one cycle
#[derive(Debug, Default)]
pub struct CycleLog {
    pub turns: Vec<TurnRecord>,
}

impl CycleLog {
    /// Render the log for the reporter prompt.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, turn) in self.turns.iter().enumerate() {
            out.push_str(&format!(
                "### Turn {}\n\n**Directive:**\n```python\n{}\n```\n\n**Result:**\n```text\n{}\n```\n",
                index + 1,
                turn.directive,
                turn.result,
            ));
            if !turn.artifacts.images.is_empty() {
                out.push_str("**Plots Generated:**\n");
                for path in &turn.artifacts.images {
                    out.push_str(&format!("- `{}`\n", path.display()));
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Runs the inner loop for one cycle and persists its report.
pub struct CycleRunner<'a> {
    client: &'a dyn LlmClient,
    runner: &'a ScriptRunner,
    config: &'a WorkflowConfig,
}

impl<'a> CycleRunner<'a> {
    pub fn new(client: &'a dyn LlmClient, runner: &'a ScriptRunner, config: &'a WorkflowConfig) -> Self {
        Self { client, runner, config }
    }

    /// Run cycle `cycle` under `directive`, with the previous cycle's
    /// persisted report text for context.
    ///
    /// The returned report's markdown is the text read back from disk, or a
    /// sentinel when the handoff could not be made durable.
    pub async fn run(
        &self,
        cycle: u32,
        directive: &str,
        previous_report: Option<&str>,
        sink: &dyn EventSink,
    ) -> Result<CycleReport> {
        let output_dir = self.runner.work_dir();
        let mut history = CycleHistory::new();
        let mut log = CycleLog::default();
        let mut figures = Vec::new();

        for index in 0..self.config.inner_iterations {
            sink.emit(ProgressEvent::IterationStarted {
                cycle,
                iteration: index + 1,
                total: self.config.inner_iterations,
            });

            let listing = artifacts::snapshot(output_dir);
            let context = PlannerContext {
                cycle_directive: directive,
                previous_report,
                directory_listing: &listing,
                history: &history,
            };

            let request = CompletionRequest::new(PLANNER_SYSTEM_PROMPT)
                .with_user_message(context.render());
            let response = self.client.complete(request).await?;

            let parsed = parse_directive(&response.content);
            sink.emit(ProgressEvent::PlannerReasoning {
                text: parsed.reasoning.clone(),
            });
            history.push_planner(&response.content);

            if parsed.reasoning.to_lowercase().contains("finish")
                && index >= self.config.min_iterations_before_finish
            {
                info!("Planner signaled finish at cycle {} iteration {}", cycle, index + 1);
                sink.emit(ProgressEvent::FinishSignaled {
                    cycle,
                    iteration: index + 1,
                });
                break;
            }

            let code = match parsed.code {
                Some(code) => code,
                None => {
                    // Hard signal: nothing runs this turn
                    warn!("No directive at cycle {} iteration {}", cycle, index + 1);
                    sink.emit(ProgressEvent::DirectiveSkipped {
                        cycle,
                        iteration: index + 1,
                    });
                    history.push_executor(
                        "No directive was provided. Nothing was executed.",
                        self.config.output_summary_limit,
                    );
                    continue;
                }
            };

            sink.emit(ProgressEvent::PlannerDirective { code: code.clone() });

            let before = artifacts::snapshot(output_dir);
            let corrector = Corrector::new(self.runner, self.client, self.config.correction_attempts);
            let result = corrector.run(&code, directive, sink).await?;
            let after = artifacts::snapshot(output_dir);

            let new_artifacts = artifacts::diff(output_dir, &before, &after);
            if !new_artifacts.is_empty() {
                sink.emit(ProgressEvent::ArtifactsCreated {
                    images: new_artifacts.images.clone(),
                    other: new_artifacts.other.clone(),
                });
            }
            figures.extend(new_artifacts.images.iter().cloned());

            let summary = match &result {
                CorrectionResult::Succeeded { output, .. } => {
                    format!("I have completed the task. Here is the raw output:\n{}", output)
                }
                CorrectionResult::Exhausted { last_error, .. } => format!(
                    "All {} execution attempts failed. Last error:\n{}",
                    self.config.correction_attempts, last_error
                ),
            };
            history.push_executor(&summary, self.config.output_summary_limit);

            log.turns.push(TurnRecord {
                directive: code,
                result: result.final_output().to_string(),
                artifacts: new_artifacts,
            });
        }

        self.write_report(cycle, &log, figures, sink).await
    }

    async fn write_report(
        &self,
        cycle: u32,
        log: &CycleLog,
        figures: Vec<std::path::PathBuf>,
        sink: &dyn EventSink,
    ) -> Result<CycleReport> {
        let request = CompletionRequest::new(REPORTER_SYSTEM_PROMPT).with_user_message(format!(
            "Please create an intermediate analysis report for cycle {} based on the \
             following logs.\n\n**STRUCTURED LOGS:**\n{}",
            cycle,
            log.render(),
        ));
        let response = self.client.complete(request).await?;

        let report = CycleReport {
            cycle,
            markdown: response.content,
            figures,
        };

        match persist_cycle_report(self.output_dir(), &report) {
            Ok(persisted) => {
                let path = self
                    .output_dir()
                    .join(crate::report::intermediate_report_filename(cycle));
                sink.emit(ProgressEvent::ReportWritten { cycle, path });
                Ok(CycleReport {
                    markdown: persisted,
                    ..report
                })
            }
            Err(CadreError::Handoff { reason, .. }) => {
                warn!("Cycle {} handoff failed: {}", cycle, reason);
                sink.emit(ProgressEvent::HandoffFailed {
                    cycle,
                    reason: reason.clone(),
                });
                Ok(CycleReport::sentinel(cycle, &reason))
            }
            Err(e) => Err(e),
        }
    }

    fn output_dir(&self) -> &Path {
        self.runner.work_dir()
    }
}
