//! The outer analysis loop: cycles, senior review, final synthesis.

use std::path::PathBuf;

use log::{info, warn};

use crate::artifacts::{self, IMAGE_SUFFIXES};
use crate::config::Config;
use crate::error::{CadreError, Result};
use crate::exec::ScriptRunner;
use crate::llm::{CompletionRequest, LlmClient, Message, Segment};
use crate::pipeline::cycle::CycleRunner;
use crate::pipeline::event::{EventSink, ProgressEvent};
use crate::pipeline::prompts::{
    initial_directive, FINALIZER_SYSTEM_PROMPT, SENIOR_DIRECTIVE_HEADING, SENIOR_SYSTEM_PROMPT,
};
use crate::report::{collect_intermediate_reports, write_final_report};

/// Drives the full multi-cycle analysis of one dataset.
pub struct AnalysisWorkflow<'a> {
    client: &'a dyn LlmClient,
    config: &'a Config,
    runner: ScriptRunner,
}

impl<'a> AnalysisWorkflow<'a> {
    pub fn new(client: &'a dyn LlmClient, config: &'a Config) -> Self {
        let runner = ScriptRunner::new(&config.executor, config.workflow.output_dir.clone());
        Self { client, config, runner }
    }

    /// Run every cycle and synthesize the final report.
    ///
    /// Returns the path of the written final report.
    pub async fn run(&self, dataset_path: &str, sink: &dyn EventSink) -> Result<PathBuf> {
        let workflow = &self.config.workflow;
        std::fs::create_dir_all(&workflow.output_dir)?;

        let cycle_runner = CycleRunner::new(self.client, &self.runner, workflow);
        let mut directive = initial_directive(dataset_path);
        let mut previous_report: Option<String> = None;

        for cycle in 1..=workflow.cycles {
            sink.emit(ProgressEvent::CycleStarted {
                cycle,
                total: workflow.cycles,
            });

            let report = cycle_runner
                .run(cycle, &directive, previous_report.as_deref(), sink)
                .await?;

            if cycle < workflow.cycles {
                directive = self.senior_review(&report.markdown, sink).await?;
            }
            previous_report = Some(report.markdown);
        }

        self.finalize(sink).await
    }

    /// Senior call between cycles: reviews the report and every figure in the
    /// output directory, returns the next cycle's directive.
    async fn senior_review(&self, report: &str, sink: &dyn EventSink) -> Result<String> {
        let mut segments = vec![Segment::text(report)];
        for name in artifacts::snapshot(&self.config.workflow.output_dir) {
            if !IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
                continue;
            }
            let path = self.config.workflow.output_dir.join(&name);
            match Segment::image_from_file(&path) {
                Ok(segment) => segments.push(segment),
                Err(e) => warn!("Skipping figure {}: {}", path.display(), e),
            }
        }
        info!("Senior reviewing report with {} segment(s)", segments.len());

        let request = CompletionRequest::new(SENIOR_SYSTEM_PROMPT)
            .with_message(Message::user_segments(segments));
        let response = self.client.complete(request).await?;

        let directive = match response.content.split_once(SENIOR_DIRECTIVE_HEADING) {
            Some((_, rest)) => rest.trim().to_string(),
            None => {
                // Format slip: carry the whole response rather than stall
                warn!("Senior response missing the directive heading, using full text");
                response.content.trim().to_string()
            }
        };

        sink.emit(ProgressEvent::SeniorDirective {
            text: directive.clone(),
        });
        Ok(directive)
    }

    /// Collect every persisted intermediate report and synthesize the final
    /// business deliverable.
    async fn finalize(&self, sink: &dyn EventSink) -> Result<PathBuf> {
        let output_dir = &self.config.workflow.output_dir;
        let combined = collect_intermediate_reports(output_dir)?;
        if combined.is_empty() {
            return Err(CadreError::InvalidState(
                "no intermediate reports to synthesize".to_string(),
            ));
        }

        let request = CompletionRequest::new(FINALIZER_SYSTEM_PROMPT).with_user_message(combined);
        let response = self.client.complete(request).await?;

        let path = write_final_report(output_dir, &response.content)?;
        sink.emit(ProgressEvent::FinalReportWritten { path: path.clone() });
        Ok(path)
    }
}
