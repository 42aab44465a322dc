//! Locale names and how they map onto catalog files.

use std::env;

/// Environment variable that overrides the operating-system locale
pub const LOCALE_ENV: &str = "TSQ_LOCALE";

/// Pick the locale to load: explicit value, then `TSQ_LOCALE`, then the OS.
pub fn resolve_locale(explicit: Option<&str>) -> Option<String> {
    pick_locale(explicit, env::var(LOCALE_ENV).ok().as_deref(), sys_locale::get_locale)
}

/// First non-blank candidate, normalized. The system lookup only runs when
/// neither the explicit value nor the override is usable.
fn pick_locale(
    explicit: Option<&str>,
    override_value: Option<&str>,
    system: impl FnOnce() -> Option<String>,
) -> Option<String> {
    [explicit, override_value]
        .into_iter()
        .flatten()
        .map(normalize_locale)
        .find(|l| !l.is_empty())
        .or_else(|| {
            system()
                .map(|l| normalize_locale(&l))
                .filter(|l| !l.is_empty())
        })
}

/// Normalize "fr-FR.UTF-8" or "fr_fr@euro" to "fr_FR"
pub fn normalize_locale(raw: &str) -> String {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or("")
        .trim()
        .replace('-', "_");

    let mut parts = base.split('_').filter(|p| !p.is_empty());
    let Some(language) = parts.next() else {
        return String::new();
    };
    let mut normalized = language.to_ascii_lowercase();
    for part in parts {
        normalized.push('_');
        // Two-letter regions are upper-case, scripts (e.g. "Hans") title-case
        if part.len() == 2 {
            normalized.push_str(&part.to_ascii_uppercase());
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                normalized.push(first.to_ascii_uppercase());
                normalized.push_str(&chars.as_str().to_ascii_lowercase());
            }
        }
    }
    normalized
}

/// Language part of a locale ("fr_FR" -> "fr")
pub fn language_code(locale: &str) -> &str {
    locale.split(['_', '-']).next().unwrap_or(locale)
}

/// Catalog suffixes to try, most specific first ("zh_Hans_CN" -> ["zh_Hans_CN", "zh_Hans", "zh"])
pub fn candidate_suffixes(locale: &str) -> Vec<String> {
    let normalized = normalize_locale(locale);
    let mut candidates = Vec::new();
    let mut current = normalized.as_str();
    while !current.is_empty() {
        candidates.push(current.to_string());
        match current.rfind('_') {
            Some(idx) => current = &current[..idx],
            None => break,
        }
    }
    candidates
}
