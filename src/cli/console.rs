//! Colored console rendering of progress events.

use colored::*;

use cadre::pipeline::event::{EventSink, ProgressEvent};

/// Prints workflow progress to stdout.
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::CycleStarted { cycle, total } => {
                println!("\n{} {}/{}", "Cycle".cyan().bold(), cycle, total);
            }
            ProgressEvent::IterationStarted { iteration, total, .. } => {
                println!("{} {}/{}", "Iteration".cyan(), iteration, total);
            }
            ProgressEvent::PlannerReasoning { text } => {
                if self.verbose {
                    println!("{}\n{}", "Planner reasoning:".blue(), text);
                }
            }
            ProgressEvent::PlannerDirective { code } => {
                println!("{}\n{}", "Directive:".blue(), code);
            }
            ProgressEvent::DirectiveSkipped { iteration, .. } => {
                println!("{} no directive in iteration {}", "Skipped:".yellow(), iteration);
            }
            ProgressEvent::FinishSignaled { iteration, .. } => {
                println!("{} planner ended the cycle at iteration {}", "Finished:".green(), iteration);
            }
            ProgressEvent::ExecutionAttempted { attempt, succeeded, output } => {
                if succeeded {
                    println!("{} attempt {}", "Executed:".green(), attempt);
                } else {
                    println!("{} attempt {}", "Failed:".red(), attempt);
                }
                if self.verbose && !output.is_empty() {
                    println!("{}", output);
                }
            }
            ProgressEvent::CorrectionRequested { attempt } => {
                println!("{} after attempt {}", "Correcting:".yellow(), attempt);
            }
            ProgressEvent::CorrectionExhausted { attempts, .. } => {
                println!("{} all {} attempts failed", "Exhausted:".red(), attempts);
            }
            ProgressEvent::ArtifactsCreated { images, other } => {
                for path in &images {
                    println!("{} {}", "Figure:".magenta(), path.display());
                }
                for path in &other {
                    println!("{} {}", "Artifact:".magenta(), path.display());
                }
            }
            ProgressEvent::ReportWritten { cycle, path } => {
                println!("{} cycle {} report at {}", "Saved:".green(), cycle, path.display());
            }
            ProgressEvent::HandoffFailed { cycle, reason } => {
                println!("{} cycle {} report not durable: {}", "Warning:".yellow(), cycle, reason);
            }
            ProgressEvent::SeniorDirective { text } => {
                println!("{}\n{}", "Senior directive:".cyan().bold(), text);
            }
            ProgressEvent::FinalReportWritten { path } => {
                println!("{} {}", "Final report:".green().bold(), path.display());
            }
            ProgressEvent::SpecialistStarted { domain } => {
                println!("{} {} review", "Reviewing:".cyan(), domain);
            }
            ProgressEvent::SpecialistFinished { domain, path } => {
                println!("{} {} report at {}", "Saved:".green(), domain, path.display());
            }
            ProgressEvent::SynthesisFinished { path } => {
                println!("{} {}", "Synthesis:".green(), path.display());
            }
            ProgressEvent::DecisionMade { publish, path } => {
                let verdict = if publish {
                    "PUBLISH".green().bold()
                } else {
                    "REJECT".red().bold()
                };
                println!("{} {} ({})", "Decision:".cyan().bold(), verdict, path.display());
            }
        }
    }
}
