//! Bounded retry loop around script execution.
//!
//! A failed directive is sent back to the model together with the code and the
//! error text; the model replies with a corrected script. The cycle repeats up
//! to a configured number of attempts, counting the initial run. A correction
//! reply with no extractable code block still consumes an attempt.

use log::{debug, warn};

use crate::directive::extract_code_block;
use crate::error::Result;
use crate::exec::script::{ExecOutcome, ScriptRunner};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::pipeline::event::{EventSink, ProgressEvent};

pub const CORRECTOR_SYSTEM_PROMPT: &str = "You are an expert Python debugger. \
You will be given a Python script that failed and the error it produced. \
Fix the script and return the complete corrected version in a single fenced \
code block. Do not explain the fix, return only the code.";

/// One execution slot, whether or not code actually ran
#[derive(Debug, Clone)]
pub struct ExecutionAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    pub code: String,
    pub output: String,
    pub succeeded: bool,
}

/// Terminal state of the correction loop
#[derive(Debug)]
pub enum CorrectionResult {
    /// Some attempt exited cleanly
    Succeeded {
        attempts: Vec<ExecutionAttempt>,
        output: String,
    },
    /// Every attempt failed; `last_error` is the final failure text verbatim
    Exhausted {
        attempts: Vec<ExecutionAttempt>,
        last_error: String,
    },
}

impl CorrectionResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, CorrectionResult::Succeeded { .. })
    }

    /// The output the planner should see: success output or the final error
    pub fn final_output(&self) -> &str {
        match self {
            CorrectionResult::Succeeded { output, .. } => output,
            CorrectionResult::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// Drives execute/diagnose/retry until success or the attempt budget runs out.
pub struct Corrector<'a> {
    runner: &'a ScriptRunner,
    client: &'a dyn LlmClient,
    max_attempts: u32,
}

impl<'a> Corrector<'a> {
    pub fn new(runner: &'a ScriptRunner, client: &'a dyn LlmClient, max_attempts: u32) -> Self {
        Self {
            runner,
            client,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Run `code`, correcting on failure, within the attempt budget.
    ///
    /// `task` is the natural-language description the script was written
    /// for, included in correction prompts so fixes stay on target. Model
    /// call errors are fatal and propagate; execution failures drive the
    /// retry loop instead.
    pub async fn run(&self, code: &str, task: &str, sink: &dyn EventSink) -> Result<CorrectionResult> {
        let mut attempts: Vec<ExecutionAttempt> = Vec::new();
        let mut current: Option<String> = Some(code.to_string());
        let mut last_script = code.to_string();
        let mut last_error = String::new();

        for index in 0..self.max_attempts {
            let attempt_number = index + 1;

            match &current {
                Some(script) => {
                    debug!("Execution attempt {}/{}", attempt_number, self.max_attempts);
                    last_script = script.clone();
                    let outcome = self.runner.run(script).await?;
                    let succeeded = outcome.succeeded();

                    sink.emit(ProgressEvent::ExecutionAttempted {
                        attempt: attempt_number,
                        succeeded,
                        output: outcome.output.clone(),
                    });

                    let output = describe_outcome(&outcome);
                    attempts.push(ExecutionAttempt {
                        attempt: attempt_number,
                        code: script.clone(),
                        output: output.clone(),
                        succeeded,
                    });

                    if succeeded {
                        return Ok(CorrectionResult::Succeeded {
                            attempts,
                            output,
                        });
                    }
                    last_error = output;
                }
                None => {
                    // The previous correction reply had no code block. The
                    // slot still counts against the budget.
                    warn!("Correction reply contained no code block, attempt {} forfeited", attempt_number);
                    let output = "Correction reply contained no runnable code block.".to_string();
                    sink.emit(ProgressEvent::ExecutionAttempted {
                        attempt: attempt_number,
                        succeeded: false,
                        output: output.clone(),
                    });
                    attempts.push(ExecutionAttempt {
                        attempt: attempt_number,
                        code: String::new(),
                        output: output.clone(),
                        succeeded: false,
                    });
                    last_error = output;
                }
            }

            if attempt_number == self.max_attempts {
                break;
            }

            sink.emit(ProgressEvent::CorrectionRequested {
                attempt: attempt_number,
            });
            current = self.request_correction(&last_script, task, &last_error).await?;
        }

        sink.emit(ProgressEvent::CorrectionExhausted {
            attempts: self.max_attempts,
            last_error: last_error.clone(),
        });

        Ok(CorrectionResult::Exhausted {
            attempts,
            last_error,
        })
    }

    async fn request_correction(&self, code: &str, task: &str, error: &str) -> Result<Option<String>> {
        let prompt = format!(
            "The following script failed. It was written for this task:\n{}\n\n\
             Script:\n```python\n{}\n```\n\n\
             Error:\n```\n{}\n```\n\n\
             Return the complete corrected script in one fenced code block.",
            task, code, error
        );

        let request = CompletionRequest::new(CORRECTOR_SYSTEM_PROMPT)
            .with_message(Message::user(prompt));

        let response = self.client.complete(request).await?;
        Ok(extract_code_block(&response.content))
    }
}

fn describe_outcome(outcome: &ExecOutcome) -> String {
    if outcome.succeeded() {
        if outcome.output.trim().is_empty() {
            "Execution succeeded with no output.".to_string()
        } else {
            outcome.output.clone()
        }
    } else if outcome.timed_out {
        format!("[timeout] {}", outcome.output)
    } else {
        format!(
            "[exit code {}]\n{}",
            outcome
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            outcome.output
        )
    }
}
