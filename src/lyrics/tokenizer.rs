//! Lyrics tokenizer.
//!
//! Line structure is read first (line and section breaks), then each line is
//! normalized and split into words and punctuation. Scripts written without spaces
//! between words are split one character per token.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::language::{self, LanguageRules};
use crate::lyrics::normalizer::{self, is_elision_apostrophe, is_word_char, Normalizer};
use crate::types::{Token, TokenKind, TokenSequence};

/// Scripts whose letters each become a separate word.
const NO_SPACE_SCRIPTS: &[&str] = &[
    "Han", "Hiragana", "Katakana", "Thai", "Lao", "Khmer", "Myanmar", "Tibetan", "Tai_Tham",
    "Phags_Pa", "Egyptian_Hieroglyphs", "Anatolian_Hieroglyphs", "Linear_A", "Linear_B",
    "Cuneiform",
];

/// Scripts checked when deciding whether two adjacent letters belong to different words.
/// Latin must stay first: ASCII letters short-circuit to index 0.
const LETTER_SCRIPTS: &[&str] = &[
    "Latin", "Greek", "Cyrillic", "Armenian", "Hebrew", "Arabic", "Syriac", "Thaana",
    "Devanagari", "Bengali", "Gurmukhi", "Gujarati", "Oriya", "Tamil", "Telugu", "Kannada",
    "Malayalam", "Sinhala", "Georgian", "Hangul", "Ethiopic", "Cherokee", "Mongolian",
    "Bopomofo", "Yi", "Javanese", "Balinese", "Sundanese", "Tifinagh", "Nko", "Vai",
    "Canadian_Aboriginal", "Han", "Hiragana", "Katakana", "Thai", "Lao", "Khmer", "Myanmar",
    "Tibetan",
];

#[allow(clippy::expect_used)]
static RE_NO_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    let class: String = NO_SPACE_SCRIPTS.iter().map(|s| format!(r"\p{{{s}}}")).collect();
    Regex::new(&format!("^[{class}]$")).expect("valid regex: RE_NO_SPACE")
});

#[allow(clippy::expect_used)]
static SCRIPT_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(LETTER_SCRIPTS.iter().map(|s| format!(r"^[\p{{L}}&&\p{{{s}}}]$")))
        .expect("valid regex set: SCRIPT_SET")
});

fn is_no_space_char(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    let mut buf = [0u8; 4];
    RE_NO_SPACE.is_match(c.encode_utf8(&mut buf))
}

/// Index into [`LETTER_SCRIPTS`] for a letter, `None` for anything else.
fn script_of(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        return Some(0);
    }
    if c.is_ascii() {
        return None;
    }
    let mut buf = [0u8; 4];
    SCRIPT_SET.matches(c.encode_utf8(&mut buf)).iter().next()
}

/// Two adjacent letters from different scripts start a new word (`Tokyo東京`).
fn script_changes(prev: char, next: char) -> bool {
    matches!((script_of(prev), script_of(next)), (Some(a), Some(b)) if a != b)
}

/// End index (exclusive) of the run of `c` starting at `start`.
fn run_end(chars: &[char], start: usize, c: char) -> usize {
    chars[start..].iter().position(|&x| x != c).map_or(chars.len(), |n| start + n)
}

fn classify(text: &str) -> TokenKind {
    match text {
        "(" => TokenKind::OpenParen,
        ")" => TokenKind::CloseParen,
        _ if text.chars().any(is_word_char) => TokenKind::Word,
        _ => TokenKind::Punctuation,
    }
}

/// Rule-based lyrics tokenizer for one language.
#[derive(Debug, Clone)]
pub struct LyricsTokenizer {
    normalizer: Normalizer,
}

impl LyricsTokenizer {
    /// Create a tokenizer applying the given rules.
    pub const fn new(rules: &'static LanguageRules) -> Self {
        Self { normalizer: Normalizer::new(rules) }
    }

    /// Create a tokenizer for a language code, falling back to the default language.
    pub fn for_language(code: &str) -> Self {
        Self::new(language::resolve(code))
    }

    /// The rules this tokenizer applies.
    pub const fn rules(&self) -> &'static LanguageRules {
        self.normalizer.rules()
    }

    /// Tokenize a lyrics text.
    ///
    /// Between two non-blank lines a single newline yields a line break; one or more
    /// blank lines yield a line break followed by a section break. Blank lines before
    /// the first or after the last lyric line yield nothing.
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        let prepared = normalizer::prepare(text);
        let mut tokens = Vec::new();
        let mut seen_content = false;
        let mut blank_lines = 0usize;

        for raw_line in prepared.split('\n') {
            let line = self.normalizer.normalize_line(raw_line);
            if line.is_empty() {
                blank_lines += 1;
                continue;
            }
            if seen_content {
                tokens.push(Token::line_break());
                if blank_lines > 0 {
                    tokens.push(Token::section_break());
                }
            }
            seen_content = true;
            blank_lines = 0;
            self.split_line(&line, &mut tokens);
        }

        TokenSequence::new(tokens)
    }

    fn split_line(&self, line: &str, tokens: &mut Vec<Token>) {
        let chars: Vec<char> = line.chars().collect();
        let mut word = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();

            if c.is_whitespace() {
                self.flush(&mut word, tokens);
                i += 1;
                continue;
            }

            if is_word_char(c) {
                if is_no_space_char(c) {
                    self.flush(&mut word, tokens);
                    self.push(c.to_string(), tokens);
                } else {
                    if word.chars().last().is_some_and(|last| script_changes(last, c)) {
                        self.flush(&mut word, tokens);
                    }
                    word.push(c);
                }
                i += 1;
                continue;
            }

            match c {
                '\'' if is_elision_apostrophe(prev, next) => {
                    word.push(c);
                    i += 1;
                }
                '*' => {
                    // Censored words (`f**k`) keep their asterisks
                    let end = run_end(&chars, i, '*');
                    let touches_word = prev.is_some_and(is_word_char)
                        || chars.get(end).copied().is_some_and(is_word_char);
                    if touches_word {
                        word.extend(&chars[i..end]);
                    } else {
                        self.flush(&mut word, tokens);
                        self.push(chars[i..end].iter().collect(), tokens);
                    }
                    i = end;
                }
                '.' | ','
                    if !word.is_empty()
                        && prev.is_some_and(char::is_numeric)
                        && next.is_some_and(char::is_numeric) =>
                {
                    word.push(c);
                    i += 1;
                }
                '.' if next.is_some_and(char::is_whitespace)
                    && self.rules().is_nonbreaking_prefix(&word) =>
                {
                    word.push(c);
                    self.flush(&mut word, tokens);
                    i += 1;
                }
                '.' => {
                    self.flush(&mut word, tokens);
                    let end = run_end(&chars, i, '.');
                    self.push(chars[i..end].iter().collect(), tokens);
                    i = end;
                }
                _ => {
                    self.flush(&mut word, tokens);
                    self.push(c.to_string(), tokens);
                    i += 1;
                }
            }
        }

        self.flush(&mut word, tokens);
    }

    fn flush(&self, word: &mut String, tokens: &mut Vec<Token>) {
        if !word.is_empty() {
            self.push(std::mem::take(word), tokens);
        }
    }

    fn push(&self, text: String, tokens: &mut Vec<Token>) {
        let kind = classify(&text);
        tokens.push(Token::new(text, kind, self.rules().casing));
    }
}

/// Tokenize `text` with the rules for `language`.
pub fn tokenize(text: &str, language: &str) -> TokenSequence {
    LyricsTokenizer::for_language(language).tokenize(text)
}
