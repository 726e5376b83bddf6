//! Edit-operation counting for words and symbol categories.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::alignment::{align, unit_cost, Alignment, EditCounts, EditOp};
use crate::types::{SymbolCategory, Token, TokenSequence};

/// How symbol tokens are aligned for precision/recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolAlignment {
    /// Punctuation and parentheses scored as in [`Self::PerCategory`], line and
    /// section breaks as in [`Self::Global`].
    #[default]
    Hybrid,
    /// One alignment over the full token streams, words included, compared on folded text.
    ///
    /// Symbols are scored where they sit relative to the surrounding words: a line
    /// break only counts as a hit when it is aligned against a line break. A
    /// substitution between two symbols of the same category is a substitution;
    /// any other pairing is a deletion for the reference token's category and an
    /// insertion for the hypothesis token's category.
    Global,
    /// Each category aligned on its own, with any two tokens of the category equal.
    ///
    /// Only presence and count matter: hits are `min(reference, hypothesis)`.
    PerCategory,
}

impl SymbolAlignment {
    /// Parse the configuration spelling (`hybrid`, `global`, `per-category`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "hybrid" => Some(Self::Hybrid),
            "global" => Some(Self::Global),
            "per-category" | "independent" => Some(Self::PerCategory),
            _ => None,
        }
    }

    /// Configuration spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Global => "global",
            Self::PerCategory => "per-category",
        }
    }
}

/// Edit counts per symbol category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCounts {
    /// Punctuation marks.
    pub punctuation: EditCounts,
    /// Parentheses.
    pub parenthesis: EditCounts,
    /// Line breaks.
    pub line_break: EditCounts,
    /// Section breaks.
    pub section_break: EditCounts,
}

impl SymbolCounts {
    /// Counts for one category.
    pub const fn get(&self, category: SymbolCategory) -> EditCounts {
        match category {
            SymbolCategory::Punctuation => self.punctuation,
            SymbolCategory::Parenthesis => self.parenthesis,
            SymbolCategory::LineBreak => self.line_break,
            SymbolCategory::SectionBreak => self.section_break,
        }
    }

    /// Mutable counts for one category.
    pub fn get_mut(&mut self, category: SymbolCategory) -> &mut EditCounts {
        match category {
            SymbolCategory::Punctuation => &mut self.punctuation,
            SymbolCategory::Parenthesis => &mut self.parenthesis,
            SymbolCategory::LineBreak => &mut self.line_break,
            SymbolCategory::SectionBreak => &mut self.section_break,
        }
    }
}

impl Add for SymbolCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            punctuation: self.punctuation + rhs.punctuation,
            parenthesis: self.parenthesis + rhs.parenthesis,
            line_break: self.line_break + rhs.line_break,
            section_break: self.section_break + rhs.section_break,
        }
    }
}

/// Everything counted for one example; sums to corpus totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleCounts {
    /// Word-level edit counts.
    pub words: EditCounts,
    /// Matched words whose original text differs in case.
    pub case_errors: usize,
    /// Symbol counts, absent when symbol scoring was skipped.
    pub symbols: Option<SymbolCounts>,
}

impl Add for ExampleCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let symbols = match (self.symbols, rhs.symbols) {
            (Some(a), Some(b)) => Some(a + b),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        };
        Self {
            words: self.words + rhs.words,
            case_errors: self.case_errors + rhs.case_errors,
            symbols,
        }
    }
}

impl AddAssign for ExampleCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ExampleCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// The word-level alignment of one example, shared by WER, case errors and the visualizer.
#[derive(Debug, Clone)]
pub struct WordAlignment {
    /// Reference word view.
    pub reference: TokenSequence,
    /// Hypothesis word view.
    pub hypothesis: TokenSequence,
    /// Alignment between the two word views, compared on folded text.
    pub alignment: Alignment,
    /// Per reference word: whether a line or section break follows it.
    pub reference_line_ends: Vec<bool>,
}

impl WordAlignment {
    /// Align the word views of two token sequences.
    pub fn new(reference: &TokenSequence, hypothesis: &TokenSequence) -> Self {
        let reference_line_ends = line_ends(reference);
        let reference = reference.words();
        let hypothesis = hypothesis.words();
        let alignment = align(reference.as_slice(), hypothesis.as_slice(), fold_cost);
        Self { reference, hypothesis, alignment, reference_line_ends }
    }

    /// Word edit counts.
    pub fn counts(&self) -> EditCounts {
        self.alignment.counts()
    }

    /// Matches whose original text differs (only case can differ for a match).
    pub fn case_errors(&self) -> usize {
        let reference = self.reference.as_slice();
        let hypothesis = self.hypothesis.as_slice();
        self.alignment
            .ops()
            .iter()
            .filter(|op| match **op {
                EditOp::Match { reference: r, hypothesis: h } => {
                    reference[r].text() != hypothesis[h].text()
                }
                _ => false,
            })
            .count()
    }
}

fn line_ends(tokens: &TokenSequence) -> Vec<bool> {
    let mut ends = Vec::new();
    for token in tokens.iter() {
        match token.category() {
            None => ends.push(false),
            Some(SymbolCategory::LineBreak | SymbolCategory::SectionBreak) => {
                if let Some(last) = ends.last_mut() {
                    *last = true;
                }
            }
            Some(_) => {}
        }
    }
    ends
}

fn fold_cost(a: &Token, b: &Token) -> usize {
    unit_cost(a.folded(), b.folded())
}

/// Count symbol edits between two full token sequences.
pub fn symbol_counts(
    reference: &TokenSequence,
    hypothesis: &TokenSequence,
    mode: SymbolAlignment,
) -> SymbolCounts {
    match mode {
        SymbolAlignment::Hybrid => {
            let breaks = global_symbol_counts(reference, hypothesis);
            let marks = per_category_symbol_counts(reference, hypothesis);
            SymbolCounts {
                line_break: breaks.line_break,
                section_break: breaks.section_break,
                ..marks
            }
        }
        SymbolAlignment::Global => global_symbol_counts(reference, hypothesis),
        SymbolAlignment::PerCategory => per_category_symbol_counts(reference, hypothesis),
    }
}

fn global_symbol_counts(reference: &TokenSequence, hypothesis: &TokenSequence) -> SymbolCounts {
    let reference = reference.as_slice();
    let hypothesis = hypothesis.as_slice();
    let alignment = align(reference, hypothesis, fold_cost);
    let mut counts = SymbolCounts::default();

    for op in alignment.ops() {
        let ref_cat = op.reference().and_then(|r| reference[r].category());
        let hyp_cat = op.hypothesis().and_then(|h| hypothesis[h].category());
        match (*op, ref_cat, hyp_cat) {
            (EditOp::Match { .. }, Some(a), Some(b)) if a == b => counts.get_mut(a).hits += 1,
            (EditOp::Substitution { .. }, Some(a), Some(b)) if a == b => {
                counts.get_mut(a).substitutions += 1;
            }
            _ => {
                if let Some(cat) = ref_cat {
                    counts.get_mut(cat).deletions += 1;
                }
                if let Some(cat) = hyp_cat {
                    counts.get_mut(cat).insertions += 1;
                }
            }
        }
    }
    counts
}

fn per_category_symbol_counts(reference: &TokenSequence, hypothesis: &TokenSequence) -> SymbolCounts {
    let mut counts = SymbolCounts::default();
    for &category in SymbolCategory::all() {
        let reference = reference.of_category(category);
        let hypothesis = hypothesis.of_category(category);
        *counts.get_mut(category) = align(&reference, &hypothesis, |_, _| 0).counts();
    }
    counts
}
