//! Dataset loading.
//!
//! Two input shapes are supported: a JSON Lines manifest with one
//! `{"reference", "hypothesis", "language"?}` object per line, or parallel lists of
//! reference and hypothesis text files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::eval::Languages;
use crate::lyrics::normalize_lyrics;

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Reference transcript.
    pub reference: String,
    /// Hypothesis transcript.
    pub hypothesis: String,
    /// Language code, when the example carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Parallel reference, hypothesis and language lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Reference transcripts.
    pub references: Vec<String>,
    /// Hypothesis transcripts.
    pub hypotheses: Vec<String>,
    /// Per-example language tags.
    pub languages: Vec<Option<String>>,
}

impl Dataset {
    /// Number of examples.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether the dataset has no examples.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Language codes for evaluation, with `default` filling untagged examples.
    ///
    /// Collapses to a single code when no example carries its own tag.
    pub fn languages(&self, default: &str) -> Languages {
        if self.languages.iter().all(Option::is_none) {
            return Languages::All(default.to_string());
        }
        Languages::PerExample(
            self.languages
                .iter()
                .map(|code| code.clone().unwrap_or_else(|| default.to_string()))
                .collect(),
        )
    }

    /// Apply [`normalize_lyrics`] to every hypothesis.
    pub fn normalize_hypotheses(&mut self) {
        for hypothesis in &mut self.hypotheses {
            *hypothesis = normalize_lyrics(hypothesis);
        }
    }
}

impl FromIterator<ManifestEntry> for Dataset {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        let mut dataset = Self::default();
        for entry in iter {
            dataset.references.push(entry.reference);
            dataset.hypotheses.push(entry.hypothesis);
            dataset.languages.push(entry.language);
        }
        dataset
    }
}

/// Parse manifest text. Blank lines are skipped; line numbers in errors are one-based.
pub fn parse_manifest(text: &str, file: Option<&Path>) -> Result<Dataset> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<ManifestEntry>(line)
                .map_err(|e| Error::parse(e.to_string(), file.map(Path::to_path_buf), idx + 1))
        })
        .collect()
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Dataset> {
    let text = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
    let dataset = parse_manifest(&text, Some(path))?;
    info!("Loaded {} examples from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Read parallel lists of reference and hypothesis files.
pub fn load_pairs(references: &[PathBuf], hypotheses: &[PathBuf]) -> Result<Dataset> {
    if references.len() != hypotheses.len() {
        return Err(Error::LengthMismatch {
            references: references.len(),
            hypotheses: hypotheses.len(),
        });
    }

    let read = |path: &PathBuf| {
        debug!("Reading {}", path.display());
        fs_err::read_to_string(path).map_err(|e| Error::io(e, path.clone()))
    };
    let mut dataset = Dataset::default();
    for (reference, hypothesis) in references.iter().zip(hypotheses) {
        dataset.references.push(read(reference)?);
        dataset.hypotheses.push(read(hypothesis)?);
        dataset.languages.push(None);
    }
    Ok(dataset)
}
