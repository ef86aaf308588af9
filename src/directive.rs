//! Structured-response parsing for planner output.
//!
//! Planner responses are untrusted prose that is expected (by prompt
//! instruction) to contain a "Reasoning" section and a "Directive" section,
//! optionally fenced as code. Extraction tries labeled headings first, then
//! a bare fenced code block, then falls back to treating the whole response
//! as reasoning with no directive.

use std::sync::LazyLock;

use regex::Regex;

/// Matches everything between a Reasoning heading and a Directive heading.
/// Heading forms: `## Reasoning`, `**Reasoning:**`, `Reasoning:` (any case).
static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:#+\s*reasoning|\*\*reasoning:?\*\*|reasoning:)\s*:?(.*?)(?:#+\s*directive|\*\*directive:?\*\*|directive:)",
    )
    .expect("reasoning regex")
});

/// Matches everything after a Directive heading.
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:#+\s*directive|\*\*directive:?\*\*|directive:)\s*:?(.*)").expect("directive regex")
});

/// Matches a fenced code block, capturing its interior.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z0-9_+-]*[ \t]*\n?(.*?)```").expect("fence regex"));

/// A planner response split into a reasoning span and an optional directive.
///
/// `code: None` means the response produced no directive at all; callers
/// must skip execution for that iteration rather than execute nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDirective {
    pub reasoning: String,
    pub code: Option<String>,
}

impl ParsedDirective {
    /// True when no executable directive was produced
    pub fn is_reasoning_only(&self) -> bool {
        self.code.is_none()
    }
}

/// Parse a planner response into reasoning and directive spans.
///
/// Pure function of the input text; no content is fabricated - both spans
/// are substrings of the original (modulo trimming and fence markers).
pub fn parse_directive(text: &str) -> ParsedDirective {
    // (a) labeled Reasoning/Directive headings
    if let (Some(reasoning_caps), Some(directive_caps)) = (REASONING_RE.captures(text), DIRECTIVE_RE.captures(text)) {
        let reasoning = reasoning_caps[1].trim().to_string();
        let code = non_empty(strip_code_fence(&directive_caps[1]));
        return ParsedDirective { reasoning, code };
    }

    // (b) bare fenced code block; everything before it is reasoning
    if let Some(caps) = FENCE_RE.captures(text) {
        let fence_start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let reasoning = text[..fence_start].trim().to_string();
        let code = non_empty(caps[1].trim().to_string());
        return ParsedDirective { reasoning, code };
    }

    // (c) no recognizable structure: all reasoning, no directive
    ParsedDirective {
        reasoning: text.trim().to_string(),
        code: None,
    }
}

/// Extract the first fenced code block from free text, if any.
///
/// Used by the corrector to pull a replacement script out of a fix response.
pub fn extract_code_block(text: &str) -> Option<String> {
    FENCE_RE.captures(text).and_then(|caps| non_empty(caps[1].trim().to_string()))
}

/// Remove fence markers from a directive span, keeping the inner code.
fn strip_code_fence(span: &str) -> String {
    if let Some(caps) = FENCE_RE.captures(span) {
        return caps[1].trim().to_string();
    }

    // Unterminated or absent fence: drop stray marker lines
    span.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
