use serde::Serialize;
use std::path::PathBuf;

use crate::catalog::{Catalog, Context, TranslationStatus};
use crate::config::split_catalog_name;

/// Message counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete and vanished messages
    pub obsolete: usize,
}

impl StatusCounts {
    fn add(&mut self, status: TranslationStatus) {
        match status {
            TranslationStatus::Finished => self.finished += 1,
            TranslationStatus::Unfinished => self.unfinished += 1,
            TranslationStatus::Obsolete | TranslationStatus::Vanished => self.obsolete += 1,
        }
    }

    /// Messages still in use
    pub fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Percentage of active messages that are finished; 100 when none are active
    pub fn completion(&self) -> f64 {
        if self.active() == 0 {
            100.0
        } else {
            self.finished as f64 * 100.0 / self.active() as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStats {
    pub name: String,
    pub counts: StatusCounts,
}

impl ContextStats {
    fn from_context(context: &Context) -> Self {
        let mut counts = StatusCounts::default();
        for message in &context.messages {
            counts.add(message.status);
        }
        Self {
            name: context.name.clone(),
            counts,
        }
    }
}

/// Completion report for one catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub totals: StatusCounts,
    pub contexts: Vec<ContextStats>,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let contexts: Vec<ContextStats> = catalog
            .contexts
            .iter()
            .map(ContextStats::from_context)
            .collect();

        let mut totals = StatusCounts::default();
        for ctx in &contexts {
            totals.finished += ctx.counts.finished;
            totals.unfinished += ctx.counts.unfinished;
            totals.obsolete += ctx.counts.obsolete;
        }

        Self {
            file: catalog.origin().to_path_buf(),
            // lupdate leaves `language` out until a translator sets it
            language: catalog
                .language
                .clone()
                .or_else(|| split_catalog_name(catalog.origin()).map(|(_, locale)| locale)),
            totals,
            contexts,
        }
    }

    /// Plain-text report, one line per context
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} ({}): {}/{} finished ({:.1}%), {} unfinished, {} obsolete\n",
            self.file.display(),
            self.language.as_deref().unwrap_or("unknown language"),
            self.totals.finished,
            self.totals.active(),
            self.totals.completion(),
            self.totals.unfinished,
            self.totals.obsolete,
        );
        let width = self
            .contexts
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);
        for ctx in &self.contexts {
            out.push_str(&format!(
                "  {:<width$}  {:>4}/{:<4} {:>5.1}%\n",
                ctx.name,
                ctx.counts.finished,
                ctx.counts.active(),
                ctx.counts.completion(),
            ));
        }
        out
    }
}
