//! Language-aware lexical normalization.
//!
//! Cleans raw lyric text before tokenization:
//! - typographic quotes, apostrophes, dashes and ellipses → ASCII forms
//! - symbols and emoji that are neither text nor punctuation → removed
//! - NFC composition
//! - whitespace collapsed per line (newlines survive)
//! - punctuation spacing per the language's convention

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::language::{self, Casing, LanguageRules, PunctuationSpacing};

/// Anything that is not a word character, whitespace or punctuation, plus the
/// variation selectors and joiners that glue emoji sequences together.
#[allow(clippy::expect_used)]
static RE_NON_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s\p{P}]|[\x{FE00}-\x{FE0F}\x{200D}]").expect("valid regex: RE_NON_TEXT")
});

/// Runs of whitespace other than newlines.
#[allow(clippy::expect_used)]
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\S\n]+").expect("valid regex: RE_SPACES")
});

/// Whitespace in front of sentence punctuation.
#[allow(clippy::expect_used)]
static RE_SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" +([,.!?;:])").expect("valid regex: RE_SPACE_BEFORE_PUNCT")
});

/// Commas and periods preceded by whitespace.
#[allow(clippy::expect_used)]
static RE_SPACE_BEFORE_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" +([,.])").expect("valid regex: RE_SPACE_BEFORE_COMMA")
});

/// High punctuation glued to the preceding word.
#[allow(clippy::expect_used)]
static RE_GLUED_HIGH_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w"')\]])([!?;:])"#).expect("valid regex: RE_GLUED_HIGH_PUNCT")
});

#[allow(clippy::expect_used)]
static RE_WORD_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w$").expect("valid regex: RE_WORD_CHAR")
});

/// Whether `c` is a word character (letter, mark, digit or connector).
pub fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || c == '_';
    }
    let mut buf = [0u8; 4];
    RE_WORD_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// Whether an apostrophe between `prev` and `next` belongs to a word.
///
/// Elisions and contractions (`don't`, `l'amour`, `nothin'`, `'cause`) keep their
/// apostrophe in every language. Only an apostrophe with no word character on
/// either side is a quotation mark.
pub fn is_elision_apostrophe(prev: Option<char>, next: Option<char>) -> bool {
    prev.is_some_and(is_word_char) || next.is_some_and(is_word_char)
}

/// Lowercase `text` using the given casing convention.
pub fn fold_case(text: &str, casing: Casing) -> String {
    match casing {
        Casing::Default => text.to_lowercase(),
        Casing::Turkic => {
            let mut out = String::with_capacity(text.len());
            for c in text.chars() {
                match c {
                    'I' => out.push('ı'),
                    'İ' => out.push('i'),
                    _ => out.extend(c.to_lowercase()),
                }
            }
            out
        }
    }
}

/// Map typographic punctuation to the ASCII forms the tokenizer understands.
pub fn fold_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2019}' | '\u{2018}' | '\u{201B}' | '\u{00B4}' | '`' | '\u{02BC}' | '\u{2032}' => {
                out.push('\'');
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{00AB}' | '\u{00BB}' | '\u{2033}' => {
                out.push('"');
            }
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => {
                out.push('-');
            }
            '\u{2026}' => out.push_str("..."),
            '\u{FF08}' => out.push('('),
            '\u{FF09}' => out.push(')'),
            _ => out.push(c),
        }
    }
    out
}

/// Replace every non-text character (symbols, emoji) with a space.
pub fn strip_non_text(text: &str) -> String {
    RE_NON_TEXT.replace_all(text, " ").into_owned()
}

/// Character-level cleanup that never touches newlines: punctuation folding,
/// non-text removal and NFC composition.
pub(crate) fn prepare(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    strip_non_text(&fold_punctuation(&text)).nfc().collect()
}

/// Language-aware normalizer bound to one rule set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: &'static LanguageRules,
}

impl Normalizer {
    /// Create a normalizer for the given rules.
    pub const fn new(rules: &'static LanguageRules) -> Self {
        Self { rules }
    }

    /// Create a normalizer for a language code, falling back to the default language.
    pub fn for_language(code: &str) -> Self {
        Self::new(language::resolve(code))
    }

    /// The rules this normalizer applies.
    pub const fn rules(&self) -> &'static LanguageRules {
        self.rules
    }

    /// Normalize a whole text, keeping its line structure.
    pub fn normalize(&self, text: &str) -> String {
        prepare(text)
            .split('\n')
            .map(|line| self.normalize_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whitespace collapsing and punctuation spacing for a single line.
    pub(crate) fn normalize_line(&self, line: &str) -> String {
        let line = RE_SPACES.replace_all(line, " ");
        let line = line.trim();
        match self.rules.spacing {
            PunctuationSpacing::Attach => RE_SPACE_BEFORE_PUNCT.replace_all(line, "$1").into_owned(),
            PunctuationSpacing::Detach => {
                let line = RE_SPACE_BEFORE_COMMA.replace_all(line, "$1");
                RE_GLUED_HIGH_PUNCT.replace_all(&line, "$1 $2").into_owned()
            }
        }
    }
}

/// Normalize `text` with the rules for `language`.
///
/// Unknown language codes use the default language's rules.
pub fn normalize(text: &str, language: &str) -> String {
    Normalizer::for_language(language).normalize(text)
}
