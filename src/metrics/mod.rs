//! Metric derivation from edit counts.
//!
//! Word error rate and its relatives come from the word-level alignment. Case
//! errors are matched words whose original text differs; since words are compared
//! case-folded, a match can only differ in case. Symbol precision/recall/F comes
//! from the symbol counts of each category.
//!
//! Corpus figures are micro-averages: counts are summed over all examples before
//! any ratio is taken, so long examples weigh more than short ones.

pub mod counts;

pub use counts::{symbol_counts, ExampleCounts, SymbolAlignment, SymbolCounts, WordAlignment};

use serde::{Deserialize, Serialize};

use crate::alignment::EditCounts;
use crate::types::{SymbolCategory, TokenSequence};

/// Precision, recall and F-measure for one symbol category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolScores {
    /// `H / (H + S + I)`.
    pub precision: f64,
    /// `H / (H + S + D)`.
    pub recall: f64,
    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub f_score: f64,
}

impl SymbolScores {
    /// Scores from category counts. Denominators are floored at 1.
    pub fn from_counts(counts: &EditCounts) -> Self {
        let precision = ratio(counts.hits, counts.hypothesis_len());
        let recall = ratio(counts.hits, counts.reference_len());
        let f_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self { precision, recall, f_score }
    }
}

/// Scores for every symbol category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetrics {
    /// Punctuation marks.
    pub punctuation: SymbolScores,
    /// Parentheses.
    pub parenthesis: SymbolScores,
    /// Line breaks.
    pub line_break: SymbolScores,
    /// Section breaks.
    pub section_break: SymbolScores,
}

impl SymbolMetrics {
    /// Scores from per-category counts.
    pub fn from_counts(counts: &SymbolCounts) -> Self {
        Self {
            punctuation: SymbolScores::from_counts(&counts.punctuation),
            parenthesis: SymbolScores::from_counts(&counts.parenthesis),
            line_break: SymbolScores::from_counts(&counts.line_break),
            section_break: SymbolScores::from_counts(&counts.section_break),
        }
    }

    /// Scores for one category.
    pub const fn get(&self, category: SymbolCategory) -> SymbolScores {
        match category {
            SymbolCategory::Punctuation => self.punctuation,
            SymbolCategory::Parenthesis => self.parenthesis,
            SymbolCategory::LineBreak => self.line_break,
            SymbolCategory::SectionBreak => self.section_break,
        }
    }
}

/// The metric set for one example or a whole corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Word error rate: `(S + D + I) / max(1, H + S + D)`.
    pub wer: f64,
    /// Match error rate: `(S + D + I) / (H + S + D + I)`, 0 when nothing was aligned.
    pub mer: f64,
    /// Word information lost: `1 - (H / (H + S + D)) * (H / (H + S + I))`.
    pub wil: f64,
    /// Case errors over reference word count.
    pub case_error_rate: f64,
    /// Symbol scores, absent when symbol scoring was skipped.
    pub symbols: Option<SymbolMetrics>,
}

impl MetricResult {
    /// Derive every metric from summed counts.
    pub fn from_counts(counts: &ExampleCounts) -> Self {
        let words = &counts.words;
        let wil = if words.total() == 0 {
            0.0
        } else {
            1.0 - ratio(words.hits, words.reference_len()) * ratio(words.hits, words.hypothesis_len())
        };
        Self {
            wer: ratio(words.errors(), words.reference_len()),
            mer: ratio(words.errors(), words.total()),
            wil,
            case_error_rate: ratio(counts.case_errors, words.reference_len()),
            symbols: counts.symbols.as_ref().map(SymbolMetrics::from_counts),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

/// Corpus-level results: micro-averaged metrics plus the per-example breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusMetrics {
    /// Number of examples evaluated.
    pub examples: usize,
    /// Counts summed over every example.
    pub counts: ExampleCounts,
    /// Metrics over the summed counts.
    pub overall: MetricResult,
    /// Metrics for each example, in input order.
    pub per_example: Vec<MetricResult>,
}

impl CorpusMetrics {
    /// Aggregate per-example counts.
    pub fn from_examples(examples: &[ExampleCounts]) -> Self {
        let counts: ExampleCounts = examples.iter().copied().sum();
        Self {
            examples: examples.len(),
            counts,
            overall: MetricResult::from_counts(&counts),
            per_example: examples.iter().map(MetricResult::from_counts).collect(),
        }
    }
}

/// Count one example from its token sequences.
///
/// Returns the word alignment alongside the counts so the visualizer can reuse it.
pub fn count_example(
    reference: &TokenSequence,
    hypothesis: &TokenSequence,
    include_other: bool,
    mode: SymbolAlignment,
) -> (ExampleCounts, WordAlignment) {
    let words = WordAlignment::new(reference, hypothesis);
    let counts = ExampleCounts {
        words: words.counts(),
        case_errors: words.case_errors(),
        symbols: include_other.then(|| symbol_counts(reference, hypothesis, mode)),
    };
    (counts, words)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

    use super::*;
    use crate::lyrics::tokenize;

    fn counts(reference: &str, hypothesis: &str, mode: SymbolAlignment) -> ExampleCounts {
        let reference = tokenize(reference, "en");
        let hypothesis = tokenize(hypothesis, "en");
        count_example(&reference, &hypothesis, true, mode).0
    }

    fn metrics(reference: &str, hypothesis: &str) -> MetricResult {
        MetricResult::from_counts(&counts(reference, hypothesis, SymbolAlignment::default()))
    }

    #[test]
    fn test_identical_text_scores_perfectly() {
        let result = metrics("Hello, world!\nHow are you?", "Hello, world!\nHow are you?");
        assert_eq!(result.wer, 0.0);
        assert_eq!(result.mer, 0.0);
        assert_eq!(result.wil, 0.0);
        assert_eq!(result.case_error_rate, 0.0);
        let symbols = result.symbols.unwrap();
        assert_eq!(symbols.punctuation.precision, 1.0);
        assert_eq!(symbols.punctuation.recall, 1.0);
        assert_eq!(symbols.line_break.f_score, 1.0);
    }

    #[test]
    fn test_case_difference_is_not_a_word_error() {
        let result = metrics("Hello", "hello");
        assert_eq!(result.wer, 0.0);
        assert_eq!(result.case_error_rate, 1.0);
    }

    #[test]
    fn test_wer_can_exceed_one() {
        let result = metrics("yes", "no no no");
        assert_eq!(result.wer, 3.0);
        assert_eq!(result.mer, 1.0);
        assert_eq!(result.wil, 1.0);
    }

    #[test]
    fn test_empty_pair_is_zero() {
        let result = metrics("", "");
        assert_eq!(result.wer, 0.0);
        assert_eq!(result.mer, 0.0);
        assert_eq!(result.wil, 0.0);
        let symbols = result.symbols.unwrap();
        assert_eq!(symbols.punctuation.f_score, 0.0);
    }

    #[test]
    fn test_empty_reference_counts_insertions() {
        let result = metrics("", "la la");
        assert_eq!(result.wer, 2.0);
    }

    #[test]
    fn test_micro_average_differs_from_mean() {
        let examples = [
            counts("a b c d e f g h i j", "a b c d e f g h x y", SymbolAlignment::Global),
            counts("a b", "x y", SymbolAlignment::Global),
        ];
        let corpus = CorpusMetrics::from_examples(&examples);
        assert_eq!(corpus.examples, 2);
        assert!((corpus.overall.wer - 4.0 / 12.0).abs() < 1e-9);
        assert!((corpus.per_example[0].wer - 0.2).abs() < 1e-9);
        assert_eq!(corpus.per_example[1].wer, 1.0);
    }

    #[test]
    fn test_missing_section_break() {
        let reference = "one\ntwo\n\nthree\nfour";
        let hypothesis = "one\ntwo\nthree\nfour";
        let result = metrics(reference, hypothesis);
        let symbols = result.symbols.unwrap();
        assert_eq!(symbols.section_break.recall, 0.0);
        assert_eq!(symbols.line_break.precision, 1.0);
        assert_eq!(symbols.line_break.recall, 1.0);
        assert_eq!(result.wer, 0.0);
    }

    #[test]
    fn test_scores_are_bounded() {
        for (reference, hypothesis) in [
            ("a, b. c!", "a b, c"),
            ("(oh) yeah", "oh (yeah)"),
            ("x\ny\n\nz", "x y z\n\n\nw"),
        ] {
            for mode in [SymbolAlignment::Hybrid, SymbolAlignment::Global, SymbolAlignment::PerCategory] {
                let result = MetricResult::from_counts(&counts(reference, hypothesis, mode));
                for &category in SymbolCategory::all() {
                    let scores = result.symbols.unwrap().get(category);
                    assert!((0.0..=1.0).contains(&scores.precision));
                    assert!((0.0..=1.0).contains(&scores.recall));
                    assert!((0.0..=1.0).contains(&scores.f_score));
                }
            }
        }
    }

    #[test]
    fn test_symbols_skipped_when_disabled() {
        let reference = tokenize("a, b", "en");
        let (counts, _) = count_example(&reference, &reference, false, SymbolAlignment::Global);
        assert!(counts.symbols.is_none());
        assert!(MetricResult::from_counts(&counts).symbols.is_none());
    }

    #[test]
    fn test_f_score_harmonic_mean() {
        let scores = SymbolScores::from_counts(&EditCounts {
            hits: 1,
            substitutions: 0,
            deletions: 1,
            insertions: 0,
        });
        assert_eq!(scores.precision, 1.0);
        assert_eq!(scores.recall, 0.5);
        assert!((scores.f_score - 2.0 / 3.0).abs() < 1e-9);
    }
}
