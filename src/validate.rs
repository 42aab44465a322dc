//! Structural and phrase checks over a loaded catalog.

use hashbrown::HashSet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::{Catalog, Location, Message, MessageKey, Translation, TranslationStatus};
use crate::config::place_marker_pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IssueKind {
    EmptySource,
    NegativeLine { line: i64 },
    FinishedWithoutTranslation,
    DuplicateMessage,
    PlaceMarkerMismatch { missing: Vec<String>, extra: Vec<String> },
    PunctuationMismatch { expected: String, found: String },
    AcceleratorMismatch,
    NumerusFormCount { expected: usize, found: usize },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptySource
            | Self::NegativeLine { .. }
            | Self::FinishedWithoutTranslation
            | Self::DuplicateMessage => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => write!(f, "message has an empty source"),
            Self::NegativeLine { line } => write!(f, "negative location line {line}"),
            Self::FinishedWithoutTranslation => {
                write!(f, "finished message has no translation")
            }
            Self::DuplicateMessage => write!(f, "duplicate message in context"),
            Self::PlaceMarkerMismatch { missing, extra } => {
                write!(f, "place markers differ")?;
                if !missing.is_empty() {
                    write!(f, "; missing {}", missing.join(", "))?;
                }
                if !extra.is_empty() {
                    write!(f, "; unexpected {}", extra.join(", "))?;
                }
                Ok(())
            }
            Self::PunctuationMismatch { expected, found } => write!(
                f,
                "ending punctuation differs (source \"{expected}\", translation \"{found}\")"
            ),
            Self::AcceleratorMismatch => write!(f, "accelerator (&) present in only one text"),
            Self::NumerusFormCount { expected, found } => {
                write!(f, "expected {expected} numerus forms, found {found}")
            }
        }
    }
}

/// A problem found in one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub context: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(
            f,
            "{severity}: [{}] {:?}: {}",
            self.context, self.source, self.kind
        )
    }
}

/// Runs every check over a catalog
#[derive(Debug, Clone)]
pub struct Checker {
    phrase_checks: bool,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Self {
            phrase_checks: true,
        }
    }

    /// Only run the structural checks (no warnings)
    pub fn structural_only(mut self) -> Self {
        self.phrase_checks = false;
        self
    }

    pub fn check(&self, catalog: &Catalog) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut seen: HashSet<MessageKey> = HashSet::new();
        let expected_forms = catalog.plural_rule().form_count();

        for (context, message) in catalog.messages() {
            let mut report = |kind: IssueKind| {
                issues.push(Issue {
                    severity: kind.severity(),
                    kind,
                    context: context.to_string(),
                    source: message.source.clone(),
                    location: message.primary_location().cloned(),
                });
            };

            if message.source.is_empty() {
                report(IssueKind::EmptySource);
            }
            for location in &message.locations {
                if location.line < 0 {
                    report(IssueKind::NegativeLine {
                        line: location.line,
                    });
                }
            }
            if !seen.insert(MessageKey::new(context, message)) {
                report(IssueKind::DuplicateMessage);
            }

            if message.status != TranslationStatus::Finished {
                continue;
            }
            if message.translation.is_empty() {
                report(IssueKind::FinishedWithoutTranslation);
                continue;
            }
            if self.phrase_checks {
                for kind in phrase_issues(message, expected_forms) {
                    report(kind);
                }
            }
        }

        issues
    }
}

fn phrase_issues(message: &Message, expected_forms: usize) -> Vec<IssueKind> {
    let mut found = Vec::new();

    if let Translation::Numerus(forms) = &message.translation {
        if forms.len() != expected_forms {
            found.push(IssueKind::NumerusFormCount {
                expected: expected_forms,
                found: forms.len(),
            });
        }
    }

    for text in message.translation.forms().filter(|t| !t.is_empty()) {
        if let Some(kind) = place_marker_issue(&message.source, text, message.numerus) {
            found.push(kind);
        }
        if let Some(kind) = punctuation_issue(&message.source, text) {
            found.push(kind);
        }
        if has_accelerator(&message.source) != has_accelerator(text) {
            found.push(IssueKind::AcceleratorMismatch);
        }
    }

    found
}

fn markers(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for m in place_marker_pattern().find_iter(text) {
        // %L1 and %1 fill the same argument slot
        let marker = m.as_str().replacen("%L", "%", 1);
        *counts.entry(marker).or_insert(0) += 1;
    }
    counts
}

fn place_marker_issue(source: &str, translation: &str, numerus: bool) -> Option<IssueKind> {
    let expected = markers(source);
    let actual = markers(translation);

    // A singular numerus form may spell the count out ("un objet")
    let optional = |marker: &str| numerus && marker == "%n";

    let missing: Vec<String> = expected
        .keys()
        .filter(|m| !actual.contains_key(*m) && !optional(m))
        .cloned()
        .collect();
    let extra: Vec<String> = actual
        .keys()
        .filter(|m| !expected.contains_key(*m))
        .cloned()
        .collect();

    if missing.is_empty() && extra.is_empty() {
        None
    } else {
        Some(IssueKind::PlaceMarkerMismatch { missing, extra })
    }
}

/// Sentence-ending punctuation, with the French space before `!?:` ignored
fn ending_punctuation(text: &str) -> &str {
    let trimmed = text.trim_end();
    for ending in ["...", "…", ".", "!", "?", ":"] {
        if trimmed.ends_with(ending) {
            return ending;
        }
    }
    ""
}

fn punctuation_issue(source: &str, translation: &str) -> Option<IssueKind> {
    let expected = ending_punctuation(source);
    let found = ending_punctuation(translation);
    let equivalent = |a: &str, b: &str| a == b || matches!((a, b), ("...", "…") | ("…", "..."));

    if equivalent(expected, found) {
        None
    } else {
        Some(IssueKind::PunctuationMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// True when the text contains a single `&` marking a shortcut letter
fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.peek() {
                Some('&') => {
                    chars.next();
                }
                Some(next) if next.is_alphanumeric() => return true,
                _ => {}
            }
        }
    }
    false
}

/// Whether any issue reaches the given severity
pub fn has_severity(issues: &[Issue], severity: Severity) -> bool {
    issues.iter().any(|i| i.severity >= severity)
}
