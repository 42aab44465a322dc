use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// File extension of Linguist catalogs
pub const CATALOG_EXTENSION: &str = "ts";

/// Matches catalog file names of the form `<prefix>_<locale>.ts`
pub fn catalog_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+?)_(?P<locale>[a-z]{2,3}(?:_[A-Z][a-z]{3})?(?:_[A-Z]{2})?)\.ts$")
            .unwrap()
    })
}

/// Split a catalog path into its prefix and locale, e.g. `erebus_fr.ts` -> ("erebus", "fr")
pub fn split_catalog_name(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let caps = catalog_file_pattern().captures(name)?;
    Some((caps["prefix"].to_string(), caps["locale"].to_string()))
}

/// Place markers a translation must preserve: `%1`..`%99`, `%L1`, `%n`, `%Ln`
pub fn place_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%L?(?:[1-9][0-9]?|n)").unwrap())
}
