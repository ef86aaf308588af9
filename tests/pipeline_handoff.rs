//! End-to-end pipeline tests over a scripted model client.
//!
//! The model boundary is faked with canned responses; scripts run through a
//! real shell so the filesystem handoff, artifact diffing, and correction
//! loop are exercised for real.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use cadre::config::{Config, ExecutorConfig, WorkflowConfig};
use cadre::error::Result;
use cadre::exec::ScriptRunner;
use cadre::llm::{CompletionRequest, CompletionResponse, LlmClient, StopReason, Usage};
use cadre::pipeline::event::{CollectingSink, ProgressEvent};
use cadre::pipeline::{AnalysisWorkflow, CycleRunner};

/// Replays canned responses in order and records every request.
struct ScriptedClient {
    responses: Mutex<Vec<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<&str>) -> Self {
        let mut responses: Vec<String> = responses.into_iter().map(String::from).collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_text(&self, index: usize) -> String {
        let requests = self.requests.lock().unwrap();
        requests[index]
            .messages
            .iter()
            .map(|m| m.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        let content = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "**Reasoning:**\nfinish\n\n**Directive:**".to_string());
        Ok(CompletionResponse {
            content,
            stop_reason: StopReason::EndTurn,
            usage: Usage::new(1, 1),
        })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn test_config(output_dir: PathBuf, cycles: u32, inner: u32) -> Config {
    Config {
        workflow: WorkflowConfig {
            cycles,
            inner_iterations: inner,
            min_iterations_before_finish: 2,
            correction_attempts: 2,
            output_summary_limit: 1500,
            output_dir,
        },
        executor: ExecutorConfig {
            command: "sh".to_string(),
            timeout_ms: 5000,
            max_output_bytes: 100000,
        },
        ..Config::default()
    }
}

fn planner_response(code: &str) -> String {
    format!(
        "**Reasoning:**\nNext I will inspect the data.\n\n**Directive:**\n```python\n{}\n```",
        code
    )
}

#[tokio::test]
async fn test_handoff_carries_persisted_report_into_next_cycle() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");

    let client = ScriptedClient::new(vec![
        // cycle 1: planner, reporter
        &planner_response("echo loaded > summary.txt"),
        "CYCLE ONE FINDINGS ALPHA",
        // senior review between cycles
        "**1. Synthesize Key Findings:**\nAlpha.\n\n4. Final Directive:\nInvestigate BETA next.",
        // cycle 2: planner, reporter
        &planner_response("echo deeper"),
        "CYCLE TWO FINDINGS GAMMA",
        // second senior review
        "4. Final Directive:\nConfirm the gamma trend.",
        // cycle 3: planner, reporter
        &planner_response("echo confirming"),
        "CYCLE THREE FINDINGS",
        // finalizer
        "FINAL REPORT BODY",
    ]);

    let config = test_config(output_dir.clone(), 3, 1);
    let sink = CollectingSink::new();

    let workflow = AnalysisWorkflow::new(&client, &config);
    let final_path = workflow.run("data.csv", &sink).await.unwrap();

    // Cycle 1's report reached disk before cycle 2 started
    let report_1 = std::fs::read_to_string(output_dir.join("intermediate_report_cycle_1.md")).unwrap();
    assert_eq!(report_1, "CYCLE ONE FINDINGS ALPHA");

    // Cycle 2's planner prompt carries the persisted text and the senior directive
    assert_eq!(client.request_count(), 9);
    let cycle_2_prompt = client.request_text(3);
    assert!(cycle_2_prompt.contains("CYCLE ONE FINDINGS ALPHA"));
    assert!(cycle_2_prompt.contains("Investigate BETA next."));
    // The senior's reasoning preamble is not part of the directive
    assert!(!cycle_2_prompt.contains("Synthesize Key Findings"));

    // Cycle 3 in turn sees cycle 2's persisted report, not cycle 1's
    let cycle_3_prompt = client.request_text(6);
    assert!(cycle_3_prompt.contains("CYCLE TWO FINDINGS GAMMA"));
    assert!(cycle_3_prompt.contains("Confirm the gamma trend."));

    // The script actually ran in the shared output directory
    assert!(output_dir.join("summary.txt").exists());

    let final_report = std::fs::read_to_string(&final_path).unwrap();
    assert_eq!(final_report, "FINAL REPORT BODY");

    let events = sink.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::ReportWritten { cycle: 1, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::FinalReportWritten { .. })));
}

#[tokio::test]
async fn test_finish_signal_honored_only_after_minimum_iterations() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");

    let finish_response = "**Reasoning:**\nWe are done, finish.\n\n**Directive:**";
    let client = ScriptedClient::new(vec![
        // iterations 1 and 2: finish is signaled too early and ignored
        finish_response,
        finish_response,
        // iteration 3: honored
        finish_response,
        // reporter, then finalizer
        "SHORT CYCLE REPORT",
        "FINAL",
    ]);

    let config = test_config(output_dir, 1, 5);
    let sink = CollectingSink::new();

    let workflow = AnalysisWorkflow::new(&client, &config);
    workflow.run("data.csv", &sink).await.unwrap();

    // Three planner calls, not five
    assert_eq!(client.request_count(), 5);

    let events = sink.events();
    let skipped = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::DirectiveSkipped { .. }))
        .count();
    assert_eq!(skipped, 2);
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::FinishSignaled { iteration: 3, .. })));
}

#[tokio::test]
async fn test_exhausted_corrections_reach_the_report_verbatim() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");

    let client = ScriptedClient::new(vec![
        &planner_response("echo unfixable >&2; exit 1"),
        // correction that still fails
        "```sh\necho still_broken >&2; exit 9\n```",
        // reporter
        "REPORT OVER FAILURES",
        "FINAL",
    ]);

    let config = test_config(output_dir, 1, 1);
    let sink = CollectingSink::new();

    let workflow = AnalysisWorkflow::new(&client, &config);
    workflow.run("data.csv", &sink).await.unwrap();

    let events = sink.events();
    assert!(events.iter().any(|e| matches!(
        e,
        ProgressEvent::CorrectionExhausted { attempts: 2, last_error } if last_error.contains("still_broken")
    )));

    // The reporter saw the final error, exit code included
    let reporter_prompt = client.request_text(2);
    assert!(reporter_prompt.contains("still_broken"));
    assert!(reporter_prompt.contains("exit code 9"));
}

#[tokio::test]
async fn test_handoff_failure_yields_sentinel_report() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");
    std::fs::create_dir_all(&output_dir).unwrap();
    // A directory squatting on the report path makes the write fail
    std::fs::create_dir_all(output_dir.join("intermediate_report_cycle_1.md")).unwrap();

    let client = ScriptedClient::new(vec![
        &planner_response("echo fine"),
        "UNPERSISTABLE REPORT",
    ]);

    let config = test_config(output_dir.clone(), 1, 1);
    let runner = ScriptRunner::new(&config.executor, output_dir);
    let cycle_runner = CycleRunner::new(&client, &runner, &config.workflow);
    let sink = CollectingSink::new();

    let report = cycle_runner.run(1, "analyze", None, &sink).await.unwrap();

    assert!(report.markdown.starts_with("Error:"));
    assert!(report.figures.is_empty());
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, ProgressEvent::HandoffFailed { cycle: 1, .. })));
}

#[tokio::test]
async fn test_artifact_diff_spans_the_whole_correction_loop() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");

    let client = ScriptedClient::new(vec![
        // First attempt drops a file and still fails
        &planner_response("touch first_attempt.tmp; exit 1"),
        // The correction drops its own file and succeeds
        "```sh\ntouch corrected_plot.png\n```",
        "REPORT",
        "FINAL",
    ]);

    let config = test_config(output_dir.clone(), 1, 1);
    let sink = CollectingSink::new();

    let workflow = AnalysisWorkflow::new(&client, &config);
    workflow.run("data.csv", &sink).await.unwrap();

    let events = sink.events();
    let created: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::ArtifactsCreated { images, other } => Some((images.clone(), other.clone())),
            _ => None,
        })
        .collect();

    // One diff for the directive's whole correction loop, never per attempt,
    // so the failed attempt's leftovers are attributed to the same turn
    assert_eq!(created.len(), 1);
    let (images, other) = &created[0];
    assert_eq!(images, &vec![output_dir.join("corrected_plot.png")]);
    assert_eq!(other, &vec![output_dir.join("first_attempt.tmp")]);
}

#[tokio::test]
async fn test_new_images_are_tracked_as_figures() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("output");

    let client = ScriptedClient::new(vec![
        &planner_response("touch histogram.png notes.txt"),
        "REPORT WITH FIGURE",
        "FINAL",
    ]);

    let config = test_config(output_dir.clone(), 1, 1);
    let sink = CollectingSink::new();

    let workflow = AnalysisWorkflow::new(&client, &config);
    workflow.run("data.csv", &sink).await.unwrap();

    let events = sink.events();
    let artifacts = events.iter().find_map(|e| match e {
        ProgressEvent::ArtifactsCreated { images, other } => Some((images.clone(), other.clone())),
        _ => None,
    });
    let (images, other) = artifacts.expect("artifact event");
    assert_eq!(images, vec![output_dir.join("histogram.png")]);
    assert_eq!(other, vec![output_dir.join("notes.txt")]);
}
