use hashbrown::{Equivalent, HashMap};
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::message::{Context, Message, MessageKey};
use crate::plural::{substitute_count, PluralRule};

/// Borrowed form of [`MessageKey`] so lookups don't allocate.
///
/// Derived `Hash` on three `&str` fields hashes the same bytes as the derived
/// `Hash` on three `String` fields, which is what `Equivalent` requires.
#[derive(Hash)]
struct KeyRef<'a> {
    context: &'a str,
    source: &'a str,
    comment: &'a str,
}

impl Equivalent<MessageKey> for KeyRef<'_> {
    fn equivalent(&self, key: &MessageKey) -> bool {
        self.context == key.context && self.source == key.source && self.comment == key.comment
    }
}

/// A loaded translation catalog with a lookup index
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Target language from the `language` attribute (e.g., "fr_FR")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    /// TS format version (e.g., "2.0", "2.1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// File the catalog was read from
    pub origin: PathBuf,
    pub contexts: Vec<Context>,
    /// (context, source, comment) -> (context index, message index)
    #[serde(skip)]
    index: HashMap<MessageKey, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog and its index. Duplicate keys keep their first entry.
    pub fn from_contexts(origin: impl Into<PathBuf>, contexts: Vec<Context>) -> Self {
        let mut catalog = Self {
            origin: origin.into(),
            contexts,
            ..Self::default()
        };
        catalog.rebuild_index();
        catalog
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (ci, context) in self.contexts.iter().enumerate() {
            for (mi, message) in context.messages.iter().enumerate() {
                self.index
                    .entry(MessageKey::new(&context.name, message))
                    .or_insert((ci, mi));
            }
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Number of messages, duplicates included
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(|c| c.messages.is_empty())
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Iterate over every message with its context name, in file order
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    /// Exact lookup on (context, source, comment)
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let key = KeyRef {
            context,
            source,
            comment: comment.unwrap_or(""),
        };
        self.index
            .get(&key)
            .map(|&(ci, mi)| &self.contexts[ci].messages[mi])
    }

    /// Servable message for a lookup, retrying without the comment when the
    /// commented entry is missing or has no text
    fn resolve(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let exact = self
            .find(context, source, comment)
            .filter(|m| m.is_servable());
        match (exact, comment) {
            (Some(m), _) => Some(m),
            (None, Some(c)) if !c.is_empty() => self
                .find(context, source, None)
                .filter(|m| m.is_servable()),
            _ => None,
        }
    }

    /// Translated text, or `None` when the caller should fall back to `source`
    pub fn translate(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        self.resolve(context, source, comment)
            .map(|m| m.translation.text())
    }

    /// Plural lookup: picks the numerus form for `n` and substitutes `%n`
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: i64,
    ) -> Option<String> {
        let message = self.resolve(context, source, comment)?;
        let index = self.plural_rule().form_index(n);
        let text = message.translation.form(index);
        Some(substitute_count(text, n).into_owned())
    }

    /// Lookup with source fallback
    pub fn tr<'a>(&'a self, context: &str, source: &'a str) -> Cow<'a, str> {
        match self.translate(context, source, None) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Borrowed(source),
        }
    }

    /// Plural rule of the catalog's target language
    pub fn plural_rule(&self) -> PluralRule {
        self.language
            .as_deref()
            .map(PluralRule::for_language)
            .unwrap_or(PluralRule::OneOther)
    }
}
