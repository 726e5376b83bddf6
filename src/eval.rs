//! Corpus evaluation entry point.
//!
//! Examples are independent: each one is tokenized, aligned and counted on the
//! rayon pool, and the counts are summed once at the end. Per-example outputs keep
//! the input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::language::DEFAULT_LANGUAGE;
use crate::error::{Error, Result};
use crate::lyrics::LyricsTokenizer;
use crate::metrics::{count_example, CorpusMetrics, ExampleCounts, MetricResult, SymbolAlignment};
use crate::visualize::{self, DiffSpan};

/// Language codes for a batch: one for all examples, or one per example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Languages {
    /// Same language for every example.
    All(String),
    /// One language per example, parallel to the references.
    PerExample(Vec<String>),
}

impl Languages {
    /// Language for the example at `index`.
    fn get(&self, index: usize) -> &str {
        match self {
            Self::All(code) => code,
            Self::PerExample(codes) => codes.get(index).map_or(DEFAULT_LANGUAGE, String::as_str),
        }
    }
}

impl Default for Languages {
    fn default() -> Self {
        Self::All(DEFAULT_LANGUAGE.to_string())
    }
}

impl From<&str> for Languages {
    fn from(code: &str) -> Self {
        Self::All(code.to_string())
    }
}

impl From<Vec<String>> for Languages {
    fn from(codes: Vec<String>) -> Self {
        Self::PerExample(codes)
    }
}

/// Evaluation switches, each with an isolated effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Compute symbol precision/recall. Word metrics are unaffected.
    pub include_other: bool,
    /// Produce a word-level diff per example.
    pub visualize_errors: bool,
    /// How symbol tokens are aligned.
    pub symbol_alignment: SymbolAlignment,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            include_other: true,
            visualize_errors: false,
            symbol_alignment: SymbolAlignment::default(),
        }
    }
}

/// Result of [`compute_metrics`].
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Micro-averaged and per-example metrics.
    pub metrics: CorpusMetrics,
    /// Diff spans per example, when requested.
    pub visualizations: Option<Vec<Vec<DiffSpan>>>,
}

struct Outcome {
    counts: ExampleCounts,
    spans: Option<Vec<DiffSpan>>,
}

/// Evaluate parallel lists of reference and hypothesis transcripts.
///
/// Fails before doing any work if the lists (or a per-example language list) differ
/// in length. Unknown language codes fall back to the default rules.
pub fn compute_metrics<R, H>(
    references: &[R],
    hypotheses: &[H],
    languages: &Languages,
    options: &EvalOptions,
) -> Result<Evaluation>
where
    R: AsRef<str> + Sync,
    H: AsRef<str> + Sync,
{
    if references.len() != hypotheses.len() {
        return Err(Error::LengthMismatch {
            references: references.len(),
            hypotheses: hypotheses.len(),
        });
    }
    if let Languages::PerExample(codes) = languages {
        if codes.len() != references.len() {
            return Err(Error::LanguageCountMismatch {
                languages: codes.len(),
                references: references.len(),
            });
        }
    }

    let outcomes = references
        .par_iter()
        .zip(hypotheses.par_iter())
        .enumerate()
        .map(|(index, (reference, hypothesis))| {
            evaluate_example(index, reference.as_ref(), hypothesis.as_ref(), languages.get(index), options)
        })
        .collect::<Result<Vec<_>>>()?;

    let (counts, spans): (Vec<_>, Vec<_>) = outcomes.into_iter().map(|o| (o.counts, o.spans)).unzip();
    let metrics = CorpusMetrics::from_examples(&counts);
    info!(
        "Evaluated {} examples: WER {:.4}, case error rate {:.4}",
        metrics.examples, metrics.overall.wer, metrics.overall.case_error_rate
    );

    let visualizations = options
        .visualize_errors
        .then(|| spans.into_iter().map(Option::unwrap_or_default).collect());
    Ok(Evaluation { metrics, visualizations })
}

/// Evaluate a single reference/hypothesis pair.
pub fn evaluate_pair(
    reference: &str,
    hypothesis: &str,
    language: &str,
    options: &EvalOptions,
) -> Result<MetricResult> {
    let outcome = evaluate_example(0, reference, hypothesis, language, options)?;
    Ok(MetricResult::from_counts(&outcome.counts))
}

fn evaluate_example(
    index: usize,
    reference: &str,
    hypothesis: &str,
    language: &str,
    options: &EvalOptions,
) -> Result<Outcome> {
    let tokenizer = LyricsTokenizer::for_language(language);
    let reference_tokens = tokenizer.tokenize(reference);
    let hypothesis_tokens = tokenizer.tokenize(hypothesis);
    if reference_tokens.is_empty() && !hypothesis_tokens.is_empty() {
        warn!("Example {index} has an empty reference; every hypothesis word is an insertion");
    }

    let (counts, words) = count_example(
        &reference_tokens,
        &hypothesis_tokens,
        options.include_other,
        options.symbol_alignment,
    );
    words.alignment.check_coverage().map_err(|message| Error::Alignment {
        index,
        language: tokenizer.rules().code.to_string(),
        reference_len: words.reference.len(),
        hypothesis_len: words.hypothesis.len(),
        message,
    })?;

    let spans = options.visualize_errors.then(|| visualize::spans(&words));
    Ok(Outcome { counts, spans })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = compute_metrics(&["a", "b"], &["a"], &Languages::default(), &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { references: 2, hypotheses: 1 }));
    }

    #[test]
    fn test_language_count_mismatch_is_rejected() {
        let languages = Languages::PerExample(vec!["en".to_string()]);
        let err = compute_metrics(&["a", "b"], &["a", "b"], &languages, &EvalOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::LanguageCountMismatch { languages: 1, references: 2 }));
    }

    #[test]
    fn test_empty_corpus() {
        let empty: [&str; 0] = [];
        let result = compute_metrics(&empty, &empty, &Languages::default(), &EvalOptions::default()).unwrap();
        assert_eq!(result.metrics.examples, 0);
        assert_eq!(result.metrics.overall.wer, 0.0);
        assert!(result.visualizations.is_none());
    }

    #[test]
    fn test_per_example_languages() {
        let languages = Languages::PerExample(vec!["en".to_string(), "ja".to_string()]);
        let result = compute_metrics(
            &["hello world", "東京都"],
            &["hello world", "東京"],
            &languages,
            &EvalOptions::default(),
        )
        .unwrap();
        assert_eq!(result.metrics.per_example[0].wer, 0.0);
        assert!((result.metrics.per_example[1].wer - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let result = evaluate_pair("Hello there", "hello there", "klingon", &EvalOptions::default()).unwrap();
        assert_eq!(result.wer, 0.0);
        assert_eq!(result.case_error_rate, 0.5);
    }

    #[test]
    fn test_include_other_only_affects_symbols() {
        let with = evaluate_pair("Hi, you!", "hi you", "en", &EvalOptions::default()).unwrap();
        let options = EvalOptions { include_other: false, ..EvalOptions::default() };
        let without = evaluate_pair("Hi, you!", "hi you", "en", &options).unwrap();
        assert!(with.symbols.is_some());
        assert!(without.symbols.is_none());
        assert_eq!(with.wer, without.wer);
        assert_eq!(with.case_error_rate, without.case_error_rate);
    }

    #[test]
    fn test_visualizations_follow_input_order() {
        let options = EvalOptions { visualize_errors: true, ..EvalOptions::default() };
        let result = compute_metrics(&["a b", "c"], &["a b", "d"], &Languages::default(), &options).unwrap();
        let visualizations = result.visualizations.unwrap();
        assert_eq!(visualizations.len(), 2);
        assert_eq!(visualizations[0].len(), 1);
        assert_eq!(visualizations[1][0].class, visualize::DiffClass::Substitution);
    }
}
