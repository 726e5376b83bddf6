//! Lyrics text processing: normalization, tokenization and corrective cleanup.

pub mod corrective;
pub mod normalizer;
pub mod tokenizer;

pub use corrective::normalize_lyrics;
pub use normalizer::{normalize, Normalizer};
pub use tokenizer::{tokenize, LyricsTokenizer};
