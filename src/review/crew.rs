//! Sequential reviewer pipeline: specialists, synthesis, editorial decision.
//!
//! Every specialist reviews the full paper independently; a synthesis call
//! merges their reports; an editor call ends in a binary PUBLISH or REJECT.
//! All reports are saved under a timestamped directory with role and date
//! headers.

use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use crate::config::ReviewConfig;
use crate::error::{CadreError, Result};
use crate::llm::{CompletionRequest, LlmClient, Message, Segment};
use crate::pipeline::event::{EventSink, ProgressEvent};
use crate::review::prompts::{
    specialist_system_prompt, specialist_task_prompt, EDITOR_SYSTEM_PROMPT, EDITOR_TASK_PROMPT,
    SYNTHESIS_SYSTEM_PROMPT, SYNTHESIS_TASK_PROMPT,
};

/// One specialist's finished review
#[derive(Debug, Clone)]
pub struct SpecialistReview {
    pub domain: String,
    pub markdown: String,
}

/// Result of a full crew run
#[derive(Debug)]
pub struct ReviewOutcome {
    pub reports_dir: PathBuf,
    pub publish: bool,
    pub decision: String,
}

pub struct ReviewCrew<'a> {
    client: &'a dyn LlmClient,
    config: &'a ReviewConfig,
}

impl<'a> ReviewCrew<'a> {
    pub fn new(client: &'a dyn LlmClient, config: &'a ReviewConfig) -> Self {
        Self { client, config }
    }

    /// Review the paper at `paper_path`, optionally with figure images.
    pub async fn run(
        &self,
        paper_path: &Path,
        figures: &[PathBuf],
        sink: &dyn EventSink,
    ) -> Result<ReviewOutcome> {
        let paper_text = std::fs::read_to_string(paper_path)?;
        let paper_name = paper_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                CadreError::InvalidState(format!("unusable paper path: {}", paper_path.display()))
            })?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let reports_dir = self
            .config
            .reports_dir
            .join(format!("{}_{}", paper_name, timestamp));
        std::fs::create_dir_all(&reports_dir)?;

        let reviews = self
            .run_specialists(&paper_text, figures, &reports_dir, sink)
            .await?;
        let synthesis = self.run_synthesis(&reviews, &reports_dir, sink).await?;
        let (publish, decision) = self.run_editorial(&synthesis, &reports_dir, sink).await?;

        self.write_summary(&reports_dir, paper_path, publish)?;
        info!("All review reports saved to {}", reports_dir.display());

        Ok(ReviewOutcome {
            reports_dir,
            publish,
            decision,
        })
    }

    async fn run_specialists(
        &self,
        paper_text: &str,
        figures: &[PathBuf],
        reports_dir: &Path,
        sink: &dyn EventSink,
    ) -> Result<Vec<SpecialistReview>> {
        let mut reviews = Vec::with_capacity(self.config.domains.len());

        for domain in &self.config.domains {
            sink.emit(ProgressEvent::SpecialistStarted {
                domain: domain.clone(),
            });

            let mut segments = vec![Segment::text(specialist_task_prompt(domain, paper_text))];
            for figure in figures {
                segments.push(Segment::image_from_file(figure)?);
            }

            let request = CompletionRequest::new(specialist_system_prompt(domain))
                .with_message(Message::user_segments(segments));
            let response = self.client.complete(request).await?;

            let path = reports_dir.join(format!(
                "specialist_{}_report.md",
                domain.to_lowercase().replace(' ', "_")
            ));
            let header = format!(
                "# {} Specialist Report\n\n**Reviewer:** Elite {} Scientific Reviewer\n**Date:** {}\n\n---\n\n",
                title_case(domain),
                title_case(domain),
                Local::now().format("%Y-%m-%d %H:%M:%S"),
            );
            std::fs::write(&path, format!("{}{}", header, response.content))?;

            sink.emit(ProgressEvent::SpecialistFinished {
                domain: domain.clone(),
                path,
            });
            reviews.push(SpecialistReview {
                domain: domain.clone(),
                markdown: response.content,
            });
        }

        Ok(reviews)
    }

    async fn run_synthesis(
        &self,
        reviews: &[SpecialistReview],
        reports_dir: &Path,
        sink: &dyn EventSink,
    ) -> Result<String> {
        let mut combined = String::new();
        for review in reviews {
            combined.push_str(&format!(
                "--- START OF {} REVIEW ---\n{}\n--- END OF REVIEW ---\n\n",
                review.domain.to_uppercase(),
                review.markdown,
            ));
        }

        let request = CompletionRequest::new(SYNTHESIS_SYSTEM_PROMPT)
            .with_user_message(format!("{}\n\n{}", SYNTHESIS_TASK_PROMPT, combined));
        let response = self.client.complete(request).await?;

        let path = reports_dir.join("synthesis_report.md");
        let header = format!(
            "# Comprehensive Synthesis Report\n\n**Compiler:** Elite Scientific Synthesis Editor\n**Date:** {}\n\n---\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
        );
        std::fs::write(&path, format!("{}{}", header, response.content))?;

        sink.emit(ProgressEvent::SynthesisFinished { path });
        Ok(response.content)
    }

    async fn run_editorial(
        &self,
        synthesis: &str,
        reports_dir: &Path,
        sink: &dyn EventSink,
    ) -> Result<(bool, String)> {
        let request = CompletionRequest::new(EDITOR_SYSTEM_PROMPT)
            .with_user_message(format!("{}\n\n{}", EDITOR_TASK_PROMPT, synthesis));
        let response = self.client.complete(request).await?;

        let publish = parse_decision(&response.content);

        let path = reports_dir.join("editorial_decision.md");
        let header = format!(
            "# Editorial Decision Report\n\n**Editor:** Chief Editor\n**Date:** {}\n\n---\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
        );
        std::fs::write(&path, format!("{}{}", header, response.content))?;

        sink.emit(ProgressEvent::DecisionMade {
            publish,
            path,
        });
        Ok((publish, response.content))
    }

    fn write_summary(&self, reports_dir: &Path, paper_path: &Path, publish: bool) -> Result<()> {
        let summary = format!(
            "# Scientific Review Summary\n\n\
             **Paper:** {}\n\
             **Review Date:** {}\n\
             **Total Specialists:** {}\n\n\
             ---\n\n\
             ## Final Result\n\n\
             **Decision:** {}\n\n\
             ## Reports Generated\n\n\
             - Individual specialist reports ({} domains)\n\
             - Comprehensive synthesis report\n\
             - Editorial decision report\n\
             - This summary report\n",
            paper_path.display(),
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.config.domains.len(),
            if publish { "PUBLISH" } else { "REJECT" },
            self.config.domains.len(),
        );
        std::fs::write(reports_dir.join("review_summary.md"), summary)?;
        Ok(())
    }
}

/// Extract the binary decision from the editor's markdown.
///
/// The first line that starts with PUBLISH or REJECT (markdown emphasis
/// stripped) wins; an unparseable response is treated as a rejection.
fn parse_decision(text: &str) -> bool {
    for line in text.lines() {
        let stripped = line.trim().trim_start_matches(['#', '*', '-', ' ']);
        if stripped.starts_with("PUBLISH") {
            return true;
        }
        if stripped.starts_with("REJECT") {
            return false;
        }
    }
    false
}

fn title_case(domain: &str) -> String {
    domain
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
