//! Plural form selection for numerus messages.
//!
//! Each language maps to one rule; a rule says how many `<numerusform>`
//! entries a catalog should carry and which one applies to a count.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::locale::language_code;

/// Plural rule families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// No plural distinction (Japanese, Chinese, Korean, ...)
    Single,
    /// Singular for exactly one (English, German, Spanish, ...)
    OneOther,
    /// Singular for zero and one (French, Brazilian Portuguese)
    FrenchLike,
    /// one / few / many (Russian, Ukrainian, ...)
    Slavic,
    Polish,
    /// one / 2-4 / other (Czech, Slovak)
    Czech,
}

impl PluralRule {
    /// Rule for a locale or bare language code such as "fr_FR" or "pt_BR"
    pub fn for_language(locale: &str) -> Self {
        if locale.replace('-', "_").eq_ignore_ascii_case("pt_BR") {
            return Self::FrenchLike;
        }
        match language_code(locale).to_ascii_lowercase().as_str() {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" => Self::Single,
            "fr" => Self::FrenchLike,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::Slavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// Number of numerus forms a catalog for this rule should contain
    pub fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::FrenchLike => 2,
            Self::Slavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the numerus form to use for `n`
    pub fn form_index(self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let (rem10, rem100) = (n % 10, n % 100);
        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::FrenchLike => usize::from(n > 1),
            Self::Slavic => {
                if rem10 == 1 && rem100 != 11 {
                    0
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }
}

fn count_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"%L?n").expect("count marker pattern is valid"))
}

/// Replace `%n` and `%Ln` with the count
pub fn substitute_count(text: &str, n: i64) -> Cow<'_, str> {
    count_marker().replace_all(text, n.to_string().as_str())
}
