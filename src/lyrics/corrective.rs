//! Opt-in corrective normalization for hypothesis lyrics.
//!
//! Nudges free-form transcripts towards common lyric annotation conventions: no
//! trailing commas or periods, and each line starting with a capital letter.
//! Evaluation never applies it; callers opt in per hypothesis.

use std::sync::LazyLock;

use regex::Regex;

use crate::lyrics::normalizer::is_word_char;

/// Trailing punctuation that lyric lines should not end with.
#[allow(clippy::expect_used)]
static RE_TRAILING_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\w!?'´‘’"“”»)]+$"#).expect("valid regex: RE_TRAILING_PUNCT")
});

/// Strip disallowed end-of-line punctuation and uppercase the first letter of each line.
///
/// A line made up only of punctuation is left alone.
pub fn normalize_lyrics(text: &str) -> String {
    text.split('\n').map(normalize_line).collect::<Vec<_>>().join("\n")
}

fn normalize_line(line: &str) -> String {
    let line = match RE_TRAILING_PUNCT.find(line) {
        Some(m) if m.start() > 0 => &line[..m.start()],
        _ => line,
    };
    capitalize(line)
}

fn capitalize(line: &str) -> String {
    let Some((idx, c)) = line.char_indices().find(|&(_, c)| is_word_char(c)) else {
        return line.to_string();
    };
    let mut out = String::with_capacity(line.len() + 2);
    out.push_str(&line[..idx]);
    out.extend(c.to_uppercase());
    out.push_str(&line[idx + c.len_utf8()..]);
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_strips_trailing_punctuation_and_capitalizes() {
        assert_eq!(normalize_lyrics("hello world.\nhow are you,"), "Hello world\nHow are you");
    }

    #[test]
    fn test_keeps_allowed_endings() {
        assert_eq!(normalize_lyrics("where are you?"), "Where are you?");
        assert_eq!(normalize_lyrics("oh (yeah)"), "Oh (yeah)");
        assert_eq!(normalize_lyrics("rockin'"), "Rockin'");
        assert_eq!(normalize_lyrics("she said \"go\""), "She said \"go\"");
    }

    #[test]
    fn test_capitalizes_after_leading_punctuation() {
        assert_eq!(normalize_lyrics("(oh) yeah!"), "(Oh) yeah!");
        assert_eq!(normalize_lyrics("\"run\" she said"), "\"Run\" she said");
    }

    #[test]
    fn test_trailing_dash_and_spaces_removed() {
        assert_eq!(normalize_lyrics("i'm here - "), "I'm here");
    }

    #[test]
    fn test_punctuation_only_line_is_kept() {
        assert_eq!(normalize_lyrics("..."), "...");
        assert_eq!(normalize_lyrics("  ..."), "  ...");
        assert_eq!(normalize_lyrics("oh ..."), "Oh");
    }

    #[test]
    fn test_blank_lines_survive() {
        assert_eq!(normalize_lyrics("a\n\nb"), "A\n\nB");
    }

    #[test]
    fn test_non_latin_is_untouched() {
        assert_eq!(normalize_lyrics("我爱你。"), "我爱你");
    }
}
