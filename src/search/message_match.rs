use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::path::PathBuf;

use crate::catalog::{Catalog, Location, Message, TranslationStatus};
use crate::error::Result;

/// Which side of a message a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchScope {
    #[default]
    Both,
    SourceOnly,
    TranslationOnly,
}

/// Which text of the message matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Source,
    Translation,
}

/// A message that matched a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageMatch {
    /// Catalog file the message came from
    pub file: PathBuf,
    pub context: String,
    pub source: String,
    pub translation: String,
    pub status: TranslationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub field: MatchedField,
}

impl MessageMatch {
    fn new(catalog: &Catalog, context: &str, message: &Message, field: MatchedField) -> Self {
        Self {
            file: catalog.origin().to_path_buf(),
            context: context.to_string(),
            source: message.source.clone(),
            translation: message.translation.text().to_string(),
            status: message.status,
            location: message.primary_location().cloned(),
            field,
        }
    }

    /// Line used when sorting and printing (0 when unknown)
    pub fn line(&self) -> i64 {
        self.location.as_ref().map(|l| l.line).unwrap_or(0)
    }
}

/// Matches query text against messages
pub struct MessageMatcher {
    regex: Regex,
    scope: MatchScope,
}

impl MessageMatcher {
    /// Build a matcher. Plain text is escaped unless `is_regex` is set.
    pub fn new(
        text: &str,
        case_sensitive: bool,
        word_match: bool,
        is_regex: bool,
        scope: MatchScope,
    ) -> Result<Self> {
        let mut pattern = if is_regex {
            text.to_string()
        } else {
            regex::escape(text)
        };
        if word_match {
            pattern = format!(r"\b(?:{pattern})\b");
        }
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self { regex, scope })
    }

    /// Which field of a message matches, source first
    pub fn match_message(&self, message: &Message) -> Option<MatchedField> {
        let check_source = self.scope != MatchScope::TranslationOnly;
        let check_translation = self.scope != MatchScope::SourceOnly;

        if check_source && self.regex.is_match(&message.source) {
            return Some(MatchedField::Source);
        }
        if check_translation && message.translation.forms().any(|t| self.regex.is_match(t)) {
            return Some(MatchedField::Translation);
        }
        None
    }

    /// All matching messages of a catalog, in file order
    pub fn search_catalog(&self, catalog: &Catalog) -> Vec<MessageMatch> {
        catalog
            .messages()
            .filter_map(|(context, message)| {
                self.match_message(message)
                    .map(|field| MessageMatch::new(catalog, context, message, field))
            })
            .collect()
    }
}
