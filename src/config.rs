//! Evaluation configuration.
//!
//! Handles loading defaults from environment variables and .env files. Command-line
//! flags override whatever is loaded here.

use std::env;

use dotenv::dotenv;

use crate::constants::{env as keys, language::DEFAULT_LANGUAGE};
use crate::error::{Error, Result};
use crate::eval::EvalOptions;
use crate::metrics::SymbolAlignment;

/// Configuration for an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Language code for examples without their own tag
    pub language: String,
    /// Evaluation switches
    pub options: EvalOptions,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            options: EvalOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from a key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(language) = lookup(keys::LANGUAGE) {
            let language = language.trim();
            if !language.is_empty() {
                config.language = language.to_string();
            }
        }

        if let Some(value) = lookup(keys::INCLUDE_OTHER) {
            config.options.include_other = parse_bool(keys::INCLUDE_OTHER, &value)?;
        }

        if let Some(value) = lookup(keys::VISUALIZE) {
            config.options.visualize_errors = parse_bool(keys::VISUALIZE, &value)?;
        }

        if let Some(value) = lookup(keys::SYMBOL_ALIGNMENT) {
            config.options.symbol_alignment = SymbolAlignment::from_name(&value).ok_or_else(|| {
                Error::config(
                    format!("{} has unknown value {value:?}", keys::SYMBOL_ALIGNMENT),
                    "Use \"hybrid\", \"global\" or \"per-category\"",
                )
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(
            format!("{key} has unknown value {value:?}"),
            "Use true/false, yes/no, on/off or 1/0",
        )),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.options, EvalOptions::default());
        assert_eq!(config.app_name(), env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn test_reads_every_key() {
        let config = config(&[
            ("LYRICS_EVAL_LANGUAGE", "de"),
            ("LYRICS_EVAL_INCLUDE_OTHER", "no"),
            ("LYRICS_EVAL_VISUALIZE", "1"),
            ("LYRICS_EVAL_SYMBOL_ALIGNMENT", "per-category"),
        ])
        .unwrap();
        assert_eq!(config.language, "de");
        assert!(!config.options.include_other);
        assert!(config.options.visualize_errors);
        assert_eq!(config.options.symbol_alignment, SymbolAlignment::PerCategory);
    }

    #[test]
    fn test_blank_language_keeps_default() {
        assert_eq!(config(&[("LYRICS_EVAL_LANGUAGE", "  ")]).unwrap().language, "en");
    }

    #[test]
    fn test_malformed_bool() {
        let err = config(&[("LYRICS_EVAL_VISUALIZE", "maybe")]).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("LYRICS_EVAL_VISUALIZE"));
    }

    #[test]
    fn test_malformed_symbol_alignment() {
        let err = config(&[("LYRICS_EVAL_SYMBOL_ALIGNMENT", "fuzzy")]).unwrap_err();
        assert!(err.to_string().contains("per-category"));
    }
}
