//! Per-language tokenization rules.
//!
//! Every supported language is one [`LanguageRules`] value in a static table; the
//! normalizer and tokenizer are a single algorithm parameterized by that value.
//! Codes are matched case-insensitively against ISO 639-1, ISO 639-2/3 and English
//! names, and anything unrecognized falls back to the default language.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::constants::language::DEFAULT_LANGUAGE;

/// How whitespace in front of sentence punctuation is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuationSpacing {
    /// Punctuation hugs the preceding word (`word,` / `word!`).
    Attach,
    /// `! ? ; :` are separated from the preceding word by a space (French typography).
    Detach,
}

/// Case folding variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// Unicode default lowercasing.
    Default,
    /// Turkic dotted/dotless `i` handling (`I` → `ı`, `İ` → `i`).
    Turkic,
}

/// Data-driven rule set for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct LanguageRules {
    /// Canonical code (ISO 639-1, or `cjk`).
    pub code: &'static str,
    /// English name.
    pub name: &'static str,
    /// Alternative codes accepted by [`resolve`].
    pub aliases: &'static [&'static str],
    /// Abbreviations whose trailing period stays attached to the word.
    pub nonbreaking_prefixes: &'static [&'static str],
    /// Punctuation spacing convention.
    pub spacing: PunctuationSpacing,
    /// Case folding convention.
    pub casing: Casing,
}

impl LanguageRules {
    /// Whether `word` followed by a period is an abbreviation rather than a sentence end.
    ///
    /// Single uppercase initials (`J. Cole`) count in every language.
    pub fn is_nonbreaking_prefix(&self, word: &str) -> bool {
        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_uppercase() {
                return true;
            }
        }
        self.nonbreaking_prefixes.contains(&word)
    }
}

const fn rules(
    code: &'static str,
    name: &'static str,
    aliases: &'static [&'static str],
    nonbreaking_prefixes: &'static [&'static str],
) -> LanguageRules {
    LanguageRules {
        code,
        name,
        aliases,
        nonbreaking_prefixes,
        spacing: PunctuationSpacing::Attach,
        casing: Casing::Default,
    }
}

static RULES: &[LanguageRules] = &[
    rules("en", "English", &["eng"], &["Mr", "Mrs", "Ms", "Dr", "St", "Jr", "Sr", "Prof", "vs"]),
    LanguageRules {
        spacing: PunctuationSpacing::Detach,
        ..rules("fr", "French", &["fra", "fre"], &["M", "Mme", "Mlle", "Dr", "St", "Ste"])
    },
    rules("de", "German", &["deu", "ger"], &["Dr", "Hr", "Fr", "Nr", "Str", "bzw", "usw", "ca"]),
    rules("es", "Spanish", &["spa", "castilian"], &["Sr", "Sra", "Srta", "Dr", "Dra", "Ud", "Uds"]),
    rules("it", "Italian", &["ita"], &["Sig", "Sigg", "Dott", "Prof", "Avv"]),
    rules("pt", "Portuguese", &["por"], &["Sr", "Sra", "Dr", "Dra"]),
    rules("nl", "Dutch", &["nld", "dut", "flemish"], &["Dhr", "Mevr", "Dr"]),
    rules("pl", "Polish", &["pol"], &["Dr", "Prof", "ul"]),
    rules("ru", "Russian", &["rus"], &[]),
    rules("uk", "Ukrainian", &["ukr"], &[]),
    rules("cs", "Czech", &["ces", "cze"], &["Dr", "Ing", "Mgr"]),
    rules("sv", "Swedish", &["swe"], &[]),
    LanguageRules { casing: Casing::Turkic, ..rules("tr", "Turkish", &["tur"], &["Dr", "Prof"]) },
    LanguageRules { casing: Casing::Turkic, ..rules("az", "Azerbaijani", &["aze"], &[]) },
    rules("ja", "Japanese", &["jpn"], &[]),
    rules("zh", "Chinese", &["zho", "chi"], &[]),
    rules("ko", "Korean", &["kor"], &[]),
    rules("th", "Thai", &["tha"], &[]),
    rules("cjk", "Chinese, Japanese and Korean", &[], &[]),
];

lazy_static! {
    /// Lookup table from every accepted spelling to its rule set
    static ref BY_KEY: HashMap<String, &'static LanguageRules> = {
        let mut m = HashMap::new();
        for lang in RULES {
            m.insert(lang.code.to_string(), lang);
            m.insert(lang.name.to_lowercase(), lang);
            for alias in lang.aliases {
                m.insert((*alias).to_string(), lang);
            }
        }
        m
    };
}

/// All registered languages, in table order.
pub fn all() -> &'static [LanguageRules] {
    RULES
}

/// Rules for the default language.
pub fn default_rules() -> &'static LanguageRules {
    lookup(DEFAULT_LANGUAGE).unwrap_or(&RULES[0])
}

/// Look up a language by code, alias or English name.
///
/// Region subtags are ignored (`pt-BR` and `en_US` resolve to `pt` and `en`).
pub fn lookup(code: &str) -> Option<&'static LanguageRules> {
    let key = code.trim().to_lowercase();
    if let Some(lang) = BY_KEY.get(&key) {
        return Some(*lang);
    }
    let primary = key.split(['-', '_']).next()?;
    BY_KEY.get(primary).copied()
}

/// Resolve a language code, falling back to the default language when it is unknown.
pub fn resolve(code: &str) -> &'static LanguageRules {
    lookup(code).unwrap_or_else(|| {
        tracing::debug!("Unrecognized language code {code:?}, using {DEFAULT_LANGUAGE} rules");
        default_rules()
    })
}
