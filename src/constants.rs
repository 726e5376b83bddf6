//! Application constants.
//!
//! Centralizes marker strings and default values shared across the pipeline.

/// Language defaults.
pub mod language {
    /// Language whose rules apply when a code is missing or unrecognized.
    pub const DEFAULT_LANGUAGE: &str = "en";
}

/// Display text for structural tokens.
pub mod markers {
    /// Text carried by a line break token.
    pub const LINE_BREAK: &str = "<L>";

    /// Text carried by a section break token.
    pub const SECTION_BREAK: &str = "<S>";
}

/// Environment variable names read by [`crate::config::Config::load`].
pub mod env {
    /// Default language code for examples without their own tag.
    pub const LANGUAGE: &str = "LYRICS_EVAL_LANGUAGE";

    /// Whether symbol precision/recall is computed.
    pub const INCLUDE_OTHER: &str = "LYRICS_EVAL_INCLUDE_OTHER";

    /// Whether error visualizations are produced.
    pub const VISUALIZE: &str = "LYRICS_EVAL_VISUALIZE";

    /// Symbol alignment strategy (`hybrid`, `global` or `per-category`).
    pub const SYMBOL_ALIGNMENT: &str = "LYRICS_EVAL_SYMBOL_ALIGNMENT";
}
