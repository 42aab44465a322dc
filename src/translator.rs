//! Runtime string lookup over one or more installed catalogs.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{Catalog, TsParser};
use crate::config::CATALOG_EXTENSION;
use crate::error::{CatalogError, Result};
use crate::locale::candidate_suffixes;
use crate::plural::substitute_count;

/// Stack of installed catalogs. The most recently installed catalog is
/// consulted first, matching how an application installs translators.
#[derive(Debug, Default)]
pub struct Translator {
    catalogs: Vec<Catalog>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a catalog on top of the stack
    pub fn install(&mut self, catalog: Catalog) {
        debug!(origin = %catalog.origin().display(), "installing catalog");
        self.catalogs.push(catalog);
    }

    /// Remove a catalog by origin. Returns whether one was removed.
    pub fn remove(&mut self, origin: &Path) -> bool {
        let before = self.catalogs.len();
        self.catalogs.retain(|c| c.origin() != origin);
        before != self.catalogs.len()
    }

    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Resolve the catalog for `locale` and install it.
    ///
    /// `prefix` is the path without locale suffix, e.g. `ts/erebus` loads
    /// `ts/erebus_fr_FR.ts`, then `ts/erebus_fr.ts`, then `ts/erebus.ts`.
    pub fn load(&mut self, prefix: &Path, locale: &str) -> Result<&Catalog> {
        let path = resolve_catalog_path(prefix, locale)?;
        let catalog = TsParser::parse_file(&path)?;
        info!(file = %path.display(), locale, "loaded catalog");
        self.install(catalog);
        Ok(&self.catalogs[self.catalogs.len() - 1])
    }

    /// Translate with no disambiguation comment
    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> Cow<'a, str> {
        self.tr_with_comment(context, source, None)
    }

    /// Translate, falling back to `source` when no catalog has a usable entry
    pub fn tr_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        self.catalogs
            .iter()
            .rev()
            .find_map(|c| c.translate(context, source, comment))
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Borrowed(source))
    }

    /// Plural translation. The fallback also gets `%n` substituted.
    pub fn tr_plural(&self, context: &str, source: &str, comment: Option<&str>, n: i64) -> String {
        self.catalogs
            .iter()
            .rev()
            .find_map(|c| c.translate_plural(context, source, comment, n))
            .unwrap_or_else(|| substitute_count(source, n).into_owned())
    }
}

/// Candidate catalog files for a locale, most specific first
pub fn catalog_candidates(prefix: &Path, locale: &str) -> Vec<PathBuf> {
    let stem = prefix
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut candidates: Vec<PathBuf> = candidate_suffixes(locale)
        .into_iter()
        .map(|suffix| prefix.with_file_name(format!("{stem}_{suffix}.{CATALOG_EXTENSION}")))
        .collect();
    candidates.push(prefix.with_file_name(format!("{stem}.{CATALOG_EXTENSION}")));
    candidates
}

/// First existing candidate file for a locale
pub fn resolve_catalog_path(prefix: &Path, locale: &str) -> Result<PathBuf> {
    let candidates = catalog_candidates(prefix, locale);
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| CatalogError::catalog_not_found(locale, &candidates))
}
