//! Word-level error visualization.
//!
//! Walks the word alignment and groups consecutive operations of the same class
//! into [`DiffSpan`]s. A span never runs past the end of a reference line, so the
//! renderers can keep the lyric's line structure. Rendering is separate:
//! [`render_html`] emits classed `<span>` markup and [`render_text`] a terminal diff.

use serde::Serialize;

use crate::alignment::EditOp;
use crate::lyrics::LyricsTokenizer;
use crate::metrics::WordAlignment;
use crate::types::Token;

/// Display class of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffClass {
    /// Words identical, case included.
    Hit,
    /// Words match only after case folding.
    CaseMismatch,
    /// Words differ.
    Substitution,
    /// Hypothesis word with no reference counterpart.
    Insertion,
    /// Reference word missing from the hypothesis.
    Deletion,
}

impl DiffClass {
    /// Render hint.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::CaseMismatch => "case-mismatch",
            Self::Substitution => "substituted",
            Self::Insertion => "inserted",
            Self::Deletion => "deleted",
        }
    }

    fn of(op: EditOp, reference: &[Token], hypothesis: &[Token]) -> Self {
        match op {
            EditOp::Match { reference: r, hypothesis: h } => {
                if reference[r].text() == hypothesis[h].text() {
                    Self::Hit
                } else {
                    Self::CaseMismatch
                }
            }
            EditOp::Substitution { .. } => Self::Substitution,
            EditOp::Insertion { .. } => Self::Insertion,
            EditOp::Deletion { .. } => Self::Deletion,
        }
    }
}

/// A run of consecutive operations sharing one display class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSpan {
    /// Display class.
    pub class: DiffClass,
    /// Reference words covered, empty for insertions.
    pub reference: Vec<Token>,
    /// Hypothesis words covered, empty for deletions.
    pub hypothesis: Vec<Token>,
    /// The last reference word ends a line or section.
    pub line_end: bool,
}

/// Tokenize both texts and build diff spans from their word alignment.
pub fn visualize(reference: &str, hypothesis: &str, language: &str) -> Vec<DiffSpan> {
    let tokenizer = LyricsTokenizer::for_language(language);
    let words = WordAlignment::new(&tokenizer.tokenize(reference), &tokenizer.tokenize(hypothesis));
    spans(&words)
}

/// Build diff spans from an existing word alignment.
pub fn spans(words: &WordAlignment) -> Vec<DiffSpan> {
    let reference = words.reference.as_slice();
    let hypothesis = words.hypothesis.as_slice();
    let mut spans: Vec<DiffSpan> = Vec::new();

    for &op in words.alignment.ops() {
        let class = DiffClass::of(op, reference, hypothesis);
        if !matches!(spans.last(), Some(span) if span.class == class && !span.line_end) {
            spans.push(DiffSpan {
                class,
                reference: Vec::new(),
                hypothesis: Vec::new(),
                line_end: false,
            });
        }
        let Some(span) = spans.last_mut() else { continue };
        if let Some(r) = op.reference() {
            span.reference.push(reference[r].clone());
            span.line_end = words.reference_line_ends.get(r) == Some(&true);
        }
        if let Some(h) = op.hypothesis() {
            span.hypothesis.push(hypothesis[h].clone());
        }
    }
    spans
}

/// Render spans as HTML, one `<span>` per token.
///
/// Classes: `hit`, `ref-case` then `hyp-case` for case mismatches, and `hyp` then
/// `ref` for every other error. Every token also carries `token-word`. A `<br>`
/// follows each span that ends a reference line.
pub fn render_html(spans: &[DiffSpan]) -> String {
    let mut parts = Vec::new();
    for span in spans {
        match span.class {
            DiffClass::Hit => {
                parts.extend(span.reference.iter().map(|t| html_token(t, "hit")));
            }
            DiffClass::CaseMismatch => {
                for (r, h) in span.reference.iter().zip(&span.hypothesis) {
                    parts.push(html_token(r, "ref-case"));
                    parts.push(html_token(h, "hyp-case"));
                }
            }
            DiffClass::Substitution | DiffClass::Insertion | DiffClass::Deletion => {
                parts.extend(span.hypothesis.iter().map(|t| html_token(t, "hyp")));
                parts.extend(span.reference.iter().map(|t| html_token(t, "ref")));
            }
        }
        if span.line_end {
            parts.push("<br>".to_string());
        }
    }
    parts.join(" ")
}

fn html_token(token: &Token, class: &str) -> String {
    format!(
        "<span class=\"token {class} token-{}\">{}</span>",
        token.kind().name(),
        escape_html(token.text())
    )
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render spans as a plain-text diff.
///
/// Deleted words appear as `[-word-]`, inserted words as `{+word+}`, substitutions
/// as both, and case mismatches as `[~Ref~]{~ref~}`. Reference line ends become newlines.
pub fn render_text(spans: &[DiffSpan]) -> String {
    let join = |tokens: &[Token]| tokens.iter().map(Token::text).collect::<Vec<_>>().join(" ");
    let mut out = String::new();
    let mut separator = "";
    for span in spans {
        let reference = join(&span.reference);
        let hypothesis = join(&span.hypothesis);
        let rendered = match span.class {
            DiffClass::Hit => reference,
            DiffClass::CaseMismatch => format!("[~{reference}~]{{~{hypothesis}~}}"),
            DiffClass::Substitution => format!("[-{reference}-]{{+{hypothesis}+}}"),
            DiffClass::Insertion => format!("{{+{hypothesis}+}}"),
            DiffClass::Deletion => format!("[-{reference}-]"),
        };
        out.push_str(separator);
        out.push_str(&rendered);
        separator = if span.line_end { "\n" } else { " " };
    }
    out
}
