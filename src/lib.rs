pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod output;
pub mod plural;
pub mod search;
pub mod stats;
pub mod translator;
pub mod tree;
pub mod validate;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// Re-export commonly used types
pub use catalog::{
    Catalog, Context, Location, Message, MessageKey, Translation, TranslationStatus, TsParser,
    TsWriter,
};
pub use error::{CatalogError, Result};
pub use output::{SimpleFormatter, TreeFormatter};
pub use plural::PluralRule;
pub use search::{CatalogFinder, MatchScope, MatchedField, MessageMatch, MessageMatcher};
pub use stats::CatalogStats;
pub use translator::Translator;
pub use tree::{NodeType, ReferenceTree, ReferenceTreeBuilder, TreeNode};
pub use validate::{Checker, Issue, IssueKind, Severity};

/// Query parameters for searching catalogs
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub case_sensitive: bool,
    pub word_match: bool,
    pub is_regex: bool,
    pub scope: MatchScope,
    pub base_dir: Option<PathBuf>,
    pub exclude_patterns: Vec<String>,
}

impl SearchQuery {
    pub fn new(text: String) -> Self {
        Self {
            text,
            case_sensitive: false,
            word_match: false,
            is_regex: false,
            scope: MatchScope::Both,
            base_dir: None,
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_word_match(mut self, word_match: bool) -> Self {
        self.word_match = word_match;
        self
    }

    pub fn with_regex(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }

    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_base_dir(mut self, base_dir: PathBuf) -> Self {
        self.base_dir = Some(base_dir);
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclude_patterns = exclusions;
        self
    }
}

/// Result of a search operation
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub query: String,
    /// Number of catalogs that were parsed and searched
    pub catalogs_searched: usize,
    pub matches: Vec<MessageMatch>,
    /// Catalogs that failed to parse
    pub skipped: Vec<PathBuf>,
}

fn base_dir_or_cwd(base_dir: Option<PathBuf>) -> PathBuf {
    base_dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default exclusions for a search root plus user-supplied ones
fn exclusions_for(root: &Path, extra: &[String]) -> Vec<String> {
    let search_dir = if root.is_file() {
        root.parent().unwrap_or(Path::new("."))
    } else {
        root
    };
    let project_type = config::detect_project_type(search_dir);
    let mut exclusions: Vec<String> = config::get_default_exclusions(project_type)
        .iter()
        .map(|&s| s.to_string())
        .collect();
    exclusions.extend(extra.iter().cloned());
    exclusions
}

/// Find every catalog below `root` (or `root` itself when it is a file)
pub fn discover_catalogs(root: &Path, extra_exclusions: &[String]) -> Result<Vec<PathBuf>> {
    let catalogs = CatalogFinder::new(root.to_path_buf())
        .add_exclusions(exclusions_for(root, extra_exclusions))
        .find()?;
    if catalogs.is_empty() {
        return Err(CatalogError::no_catalogs(root));
    }
    Ok(catalogs)
}

/// Searches every catalog below the base directory for the query text
///
/// 1. Discovers `.ts` catalogs, skipping excluded directories
/// 2. Parses each; catalogs that fail to parse are skipped and reported
/// 3. Matches messages and sorts them by file, context and line
#[must_use = "this function returns a Result that should be handled"]
pub fn run_search(query: SearchQuery) -> Result<SearchResult> {
    let root = base_dir_or_cwd(query.base_dir.clone());
    let matcher = MessageMatcher::new(
        &query.text,
        query.case_sensitive,
        query.word_match,
        query.is_regex,
        query.scope,
    )?;

    let paths = CatalogFinder::new(root.clone())
        .add_exclusions(exclusions_for(&root, &query.exclude_patterns))
        .find()?;
    debug!(count = paths.len(), root = %root.display(), "discovered catalogs");

    let mut matches = Vec::new();
    let mut skipped = Vec::new();
    let mut catalogs_searched = 0;

    for path in paths {
        match TsParser::parse_file(&path) {
            Ok(catalog) => {
                catalogs_searched += 1;
                matches.extend(matcher.search_catalog(&catalog));
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping catalog");
                skipped.push(path);
            }
        }
    }

    matches.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.context.cmp(&b.context))
            .then_with(|| a.line().cmp(&b.line()))
    });

    Ok(SearchResult {
        query: query.text,
        catalogs_searched,
        matches,
        skipped,
    })
}

/// Issues found in one catalog
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub file: PathBuf,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }
}

/// Parse and check every catalog below `root`. A catalog that fails to parse
/// is an error, not a skipped file.
#[must_use = "this function returns a Result that should be handled"]
pub fn run_check(root: &Path, checker: &Checker) -> Result<Vec<CheckReport>> {
    discover_catalogs(root, &[])?
        .into_iter()
        .map(|path| {
            let catalog = TsParser::parse_file(&path)?;
            Ok(CheckReport {
                issues: checker.check(&catalog),
                file: path,
            })
        })
        .collect()
}

/// Completion statistics for every catalog below `root`
#[must_use = "this function returns a Result that should be handled"]
pub fn run_stats(root: &Path) -> Result<Vec<CatalogStats>> {
    discover_catalogs(root, &[])?
        .into_iter()
        .map(|path| TsParser::parse_file(&path).map(|c| CatalogStats::from_catalog(&c)))
        .collect()
}
