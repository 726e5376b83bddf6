//! Core token types shared by the tokenizer, aligner and metrics.
//!
//! Tokens are immutable once built: their kind is fixed at tokenization time and
//! the case-folded form is computed up front with the language's casing rules.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::markers;
use crate::language::Casing;
use crate::lyrics::normalizer::fold_case;

/// Characters dropped from a word token when it is scored as a word.
#[allow(clippy::expect_used)]
static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w']").expect("valid regex: RE_NON_WORD")
});

/// The kind of a token, assigned once by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Anything containing a word character.
    Word,
    /// Punctuation other than parentheses.
    Punctuation,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// End of a lyric line.
    LineBreak,
    /// Blank line between two lyric sections.
    SectionBreak,
}

impl TokenKind {
    /// The symbol category this kind is scored under, `None` for words.
    #[must_use]
    pub const fn category(self) -> Option<SymbolCategory> {
        match self {
            Self::Word => None,
            Self::Punctuation => Some(SymbolCategory::Punctuation),
            Self::OpenParen | Self::CloseParen => Some(SymbolCategory::Parenthesis),
            Self::LineBreak => Some(SymbolCategory::LineBreak),
            Self::SectionBreak => Some(SymbolCategory::SectionBreak),
        }
    }

    /// Returns the lowercase name used in rendered class names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Punctuation => "punctuation",
            Self::OpenParen | Self::CloseParen => "parenthesis",
            Self::LineBreak => "line_break",
            Self::SectionBreak => "section_break",
        }
    }
}

/// Non-word token categories that get precision/recall scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolCategory {
    /// Punctuation marks.
    Punctuation,
    /// Opening and closing parentheses (background vocals).
    Parenthesis,
    /// Line breaks.
    LineBreak,
    /// Section breaks.
    SectionBreak,
}

impl SymbolCategory {
    /// Returns all categories in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Punctuation, Self::Parenthesis, Self::LineBreak, Self::SectionBreak]
    }

    /// Returns the human-readable name of this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Punctuation => "Punctuation",
            Self::Parenthesis => "Parentheses",
            Self::LineBreak => "Line breaks",
            Self::SectionBreak => "Section breaks",
        }
    }
}

/// A single token with its original text and case-folded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    text: String,
    kind: TokenKind,
    folded: String,
}

impl Token {
    /// Create a token, folding its text with the given casing rules.
    pub fn new(text: impl Into<String>, kind: TokenKind, casing: Casing) -> Self {
        let text = text.into();
        let folded = fold_case(&text, casing);
        Self { text, kind, folded }
    }

    /// A line break marker.
    #[must_use]
    pub fn line_break() -> Self {
        Self::new(markers::LINE_BREAK, TokenKind::LineBreak, Casing::Default)
    }

    /// A section break marker.
    #[must_use]
    pub fn section_break() -> Self {
        Self::new(markers::SECTION_BREAK, TokenKind::SectionBreak, Casing::Default)
    }

    /// Original text, case preserved.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Kind assigned by the tokenizer.
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Case-folded text used for case-insensitive comparison.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whether this is a word token.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Symbol category, `None` for words.
    pub const fn category(&self) -> Option<SymbolCategory> {
        self.kind.category()
    }

    /// The token as scored for WER: only word characters and apostrophes survive.
    ///
    /// Returns `None` for non-word tokens.
    #[must_use]
    pub fn word_form(&self) -> Option<Self> {
        if !self.is_word() {
            return None;
        }
        Some(Self {
            text: RE_NON_WORD.replace_all(&self.text, "").into_owned(),
            kind: TokenKind::Word,
            folded: RE_NON_WORD.replace_all(&self.folded, "").into_owned(),
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// An ordered, immutable sequence of tokens produced from one input string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence(Vec<Token>);

impl TokenSequence {
    /// Wrap an already tokenized list.
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }

    /// Borrow the tokens as a slice.
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence has no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    /// Word view of the sequence (see [`Token::word_form`]).
    #[must_use]
    pub fn words(&self) -> Self {
        self.0.iter().filter_map(Token::word_form).collect()
    }

    /// Tokens belonging to one symbol category, in order.
    pub fn of_category(&self, category: SymbolCategory) -> Vec<&Token> {
        self.0.iter().filter(|t| t.category() == Some(category)).collect()
    }

    /// Token texts, mostly useful in tests and debug output.
    pub fn texts(&self) -> Vec<&str> {
        self.0.iter().map(Token::text).collect()
    }
}

impl FromIterator<Token> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
