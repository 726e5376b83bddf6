//! `lyrics-eval` - evaluation of automatic lyrics transcription.
//!
//! Compares hypothesis transcripts against reference lyrics and reports word error
//! rate (with MER and WIL), case error rate, and precision/recall/F-score for
//! punctuation, parentheses, line breaks and section breaks. Word-level error
//! visualizations can be produced alongside the metrics.
//!
//! ```
//! use lyrics_eval::{compute_metrics, EvalOptions, Languages};
//!
//! let evaluation = compute_metrics(
//!     &["Hello, world!\nHow are you?"],
//!     &["hello world how are you"],
//!     &Languages::from("en"),
//!     &EvalOptions::default(),
//! )?;
//! assert_eq!(evaluation.metrics.overall.wer, 0.0);
//! # Ok::<(), lyrics_eval::error::Error>(())
//! ```

pub mod alignment;
pub mod config;
pub mod constants;
pub mod error;
pub mod eval;
pub mod language;
pub mod lyrics;
pub mod manifest;
pub mod metrics;
pub mod types;
pub mod visualize;

pub use eval::{compute_metrics, evaluate_pair, EvalOptions, Evaluation, Languages};
pub use lyrics::{normalize, normalize_lyrics, tokenize};
pub use metrics::{CorpusMetrics, MetricResult, SymbolAlignment};
pub use visualize::{visualize, DiffSpan};
