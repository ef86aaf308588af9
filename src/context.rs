//! Per-cycle conversation state and planner context assembly.
//!
//! Each cycle owns an append-only turn history that is discarded at the
//! cycle boundary; only the rendered cycle report survives. Executor output
//! is truncated at a line boundary before it enters the history so a noisy
//! script cannot poison later planner prompts.

use std::collections::BTreeSet;

/// Literal marker appended to truncated executor output
pub const TRUNCATION_MARKER: &str = "... [Output truncated for brevity] ...";

/// Shown as the previous-report section in the first cycle
pub const NO_PREVIOUS_REPORT: &str = "No previous report. This is the first cycle.";

/// Truncate output to at most `max_length` characters, cutting at the last
/// line boundary at or before the limit, and append the truncation marker.
///
/// Output at or under the limit is returned unchanged, without a marker.
pub fn truncate_output(output: &str, max_length: usize) -> String {
    if output.len() <= max_length {
        return output.to_string();
    }

    let mut end = max_length;
    while !output.is_char_boundary(end) {
        end -= 1;
    }

    let slice = &output[..end];
    // Cut at the last newline to avoid splitting a line in the middle
    let cut = slice.rfind('\n').unwrap_or(slice.len());

    format!("{}\n\n{}", &slice[..cut], TRUNCATION_MARKER)
}

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    Planner,
    Executor,
}

/// One turn of the planner/executor conversation
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

/// Append-only turn history scoped to a single cycle.
#[derive(Debug, Default)]
pub struct CycleHistory {
    turns: Vec<ConversationTurn>,
}

impl CycleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a planner turn verbatim
    pub fn push_planner(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Planner,
            text: text.into(),
        });
    }

    /// Record an executor turn, truncated to `summary_limit` characters
    pub fn push_executor(&mut self, output: &str, summary_limit: usize) {
        self.turns.push(ConversationTurn {
            role: TurnRole::Executor,
            text: truncate_output(output, summary_limit),
        });
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Most recent executor output, if any turn was an executor turn
    pub fn last_executor_output(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == TurnRole::Executor)
            .map(|turn| turn.text.as_str())
    }

    /// Render the history as labeled sections for the planner prompt
    pub fn render(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            match turn.role {
                TurnRole::Planner => {
                    out.push_str("\n**Your Last Turn (Reasoning & Directive):**\n");
                }
                TurnRole::Executor => {
                    out.push_str("\n**Executor's Last Output:**\n");
                }
            }
            out.push_str(&turn.text);
            out.push('\n');
        }
        out
    }
}

/// Everything a planner prompt is grounded in for one inner iteration.
#[derive(Debug)]
pub struct PlannerContext<'a> {
    /// Fixed high-level directive for the outer cycle
    pub cycle_directive: &'a str,

    /// The previous cycle's persisted report text
    pub previous_report: Option<&'a str>,

    /// Snapshot of the working directory entry names
    pub directory_listing: &'a BTreeSet<String>,

    /// This cycle's turn history
    pub history: &'a CycleHistory,
}

impl PlannerContext<'_> {
    /// Assemble the user prompt for the planner call.
    pub fn render(&self) -> String {
        let listing = if self.directory_listing.is_empty() {
            "(empty)".to_string()
        } else {
            self.directory_listing.iter().cloned().collect::<Vec<_>>().join(", ")
        };

        format!(
            "**High-Level Directive for this Cycle:**\n{}\n\n\
             **Previous Cycle Report:**\n{}\n\n\
             **Current Contents of the Output Directory (Your Long-Term Memory):**\n{}\n\n\
             **Session History So Far:**\n{}",
            self.cycle_directive,
            self.previous_report.unwrap_or(NO_PREVIOUS_REPORT),
            listing,
            self.history.render(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_under_limit_unchanged() {
        let output = "x".repeat(1000);
        assert_eq!(truncate_output(&output, 1500), output);
    }

    #[test]
    fn test_truncate_at_line_boundary_with_marker() {
        let line = "0123456789\n";
        let output = line.repeat(200); // 2200 chars
        let truncated = truncate_output(&output, 1500);

        assert!(truncated.ends_with(TRUNCATION_MARKER));
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap().trim_end();
        assert!(body.len() <= 1500);
        // Cut lands on a full line, never mid-line
        assert!(body.ends_with("0123456789"));
    }

    #[test]
    fn test_truncate_exact_limit_unchanged() {
        let output = "a".repeat(1500);
        assert_eq!(truncate_output(&output, 1500), output);
    }

    #[test]
    fn test_truncate_without_newline_keeps_slice() {
        let output = "a".repeat(2000);
        let truncated = truncate_output(&output, 1500);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.starts_with(&"a".repeat(1500)));
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let output = "é".repeat(1000); // 2000 bytes
        let truncated = truncate_output(&output, 1501);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_history_append_order() {
        let mut history = CycleHistory::new();
        history.push_planner("plan the load");
        history.push_executor("loaded 100 rows", 1500);

        assert_eq!(history.len(), 2);
        let rendered = history.render();
        let planner_pos = rendered.find("plan the load").unwrap();
        let executor_pos = rendered.find("loaded 100 rows").unwrap();
        assert!(planner_pos < executor_pos);
    }

    #[test]
    fn test_history_executor_turns_truncated() {
        let mut history = CycleHistory::new();
        let noisy = "line\n".repeat(1000);
        history.push_executor(&noisy, 100);

        let stored = history.last_executor_output().unwrap();
        assert!(stored.ends_with(TRUNCATION_MARKER));
        assert!(stored.len() < noisy.len());
    }

    #[test]
    fn test_last_executor_output_skips_planner_turns() {
        let mut history = CycleHistory::new();
        history.push_executor("first", 1500);
        history.push_planner("thinking");
        assert_eq!(history.last_executor_output(), Some("first"));
    }

    #[test]
    fn test_planner_context_render_sections() {
        let mut history = CycleHistory::new();
        history.push_planner("prior reasoning");
        let listing: BTreeSet<String> = ["data.parquet".to_string(), "fig.png".to_string()].into_iter().collect();

        let context = PlannerContext {
            cycle_directive: "Analyze income stability",
            previous_report: Some("# Cycle 1 Report\nincome is seasonal"),
            directory_listing: &listing,
            history: &history,
        };

        let rendered = context.render();
        assert!(rendered.contains("Analyze income stability"));
        assert!(rendered.contains("income is seasonal"));
        assert!(rendered.contains("data.parquet, fig.png"));
        assert!(rendered.contains("prior reasoning"));
    }

    #[test]
    fn test_planner_context_first_cycle_placeholder() {
        let history = CycleHistory::new();
        let listing = BTreeSet::new();
        let context = PlannerContext {
            cycle_directive: "Begin EDA",
            previous_report: None,
            directory_listing: &listing,
            history: &history,
        };

        let rendered = context.render();
        assert!(rendered.contains(NO_PREVIOUS_REPORT));
        assert!(rendered.contains("(empty)"));
    }
}
