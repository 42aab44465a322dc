use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a source string was found by the extraction tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Source file, relative to the catalog (e.g., "../playinggamestate.cpp")
    pub filename: PathBuf,
    /// Line number as written in the catalog. Kept signed so the checker can
    /// report bogus values instead of the loader rejecting them.
    pub line: i64,
}

impl Location {
    pub fn new(filename: impl Into<PathBuf>, line: i64) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename.display(), self.line)
    }
}

/// Completion state of a translation, from the `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// No `type` attribute: the translator marked the entry done
    #[default]
    Finished,
    Unfinished,
    /// The source string no longer exists in the code
    Obsolete,
    /// Like obsolete, written by newer lupdate versions
    Vanished,
}

impl TranslationStatus {
    /// Parse the value of a `type` attribute
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            "finished" => Some(Self::Finished),
            _ => None,
        }
    }

    /// Attribute value written back to a catalog; `None` means no attribute
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Obsolete and vanished entries are kept for translators but never served
    pub fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
            Self::Vanished => "vanished",
        };
        f.write_str(s)
    }
}

/// Translated text of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Translation {
    Single(String),
    /// One entry per plural form, in the order of the language's rule
    Numerus(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl Translation {
    /// True when no text has been supplied for any form
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(|f| f.is_empty()),
        }
    }

    /// The singular text, or the first numerus form
    pub fn text(&self) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Numerus(forms) => forms.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Text for a plural form index, clamped to the last available form
    pub fn form(&self, index: usize) -> &str {
        match self {
            Self::Single(text) => text,
            Self::Numerus(forms) => forms
                .get(index)
                .or_else(|| forms.last())
                .map(String::as_str)
                .unwrap_or(""),
        }
    }

    /// Iterate over every form's text
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Numerus(forms) => forms,
        };
        slice.iter().map(String::as_str)
    }
}

/// A single translatable string of a context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Original text, used as the lookup key
    pub source: String,
    /// Disambiguation comment, part of the lookup key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Developer note for translators (`extracomment`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    /// Note left by a translator (`translatorcomment`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    /// Message id for id-based catalogs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub locations: Vec<Location>,
    pub translation: Translation,
    pub status: TranslationStatus,
    /// Declared with `numerus="yes"`
    pub numerus: bool,
}

impl Message {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_translation(mut self, text: impl Into<String>) -> Self {
        self.translation = Translation::Single(text.into());
        self
    }

    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Comment used in the lookup key (empty when absent)
    pub fn key_comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// First location, if any
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations.first()
    }

    /// Whether lookups may return this message's text
    pub fn is_servable(&self) -> bool {
        !self.status.is_retired() && !self.translation.is_empty()
    }
}

/// A named group of messages, usually one window or dialog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Uniqueness key of a message within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub comment: String,
}

impl MessageKey {
    pub fn new(context: &str, message: &Message) -> Self {
        Self {
            context: context.to_string(),
            source: message.source.clone(),
            comment: message.key_comment().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_attr_round_trip() {
        assert_eq!(
            TranslationStatus::from_attr("unfinished"),
            Some(TranslationStatus::Unfinished)
        );
        assert_eq!(TranslationStatus::from_attr("bogus"), None);
        assert_eq!(TranslationStatus::Finished.as_attr(), None);
        assert_eq!(TranslationStatus::Vanished.as_attr(), Some("vanished"));
    }

    #[test]
    fn test_retired_statuses() {
        assert!(TranslationStatus::Obsolete.is_retired());
        assert!(TranslationStatus::Vanished.is_retired());
        assert!(!TranslationStatus::Unfinished.is_retired());
        assert!(!TranslationStatus::Finished.is_retired());
    }

    #[test]
    fn test_numerus_form_clamps_to_last() {
        let t = Translation::Numerus(vec!["%n objet".into(), "%n objets".into()]);
        assert_eq!(t.form(0), "%n objet");
        assert_eq!(t.form(1), "%n objets");
        assert_eq!(t.form(7), "%n objets");
        assert_eq!(t.text(), "%n objet");
    }

    #[test]
    fn test_translation_emptiness() {
        assert!(Translation::default().is_empty());
        assert!(Translation::Numerus(vec![String::new(), String::new()]).is_empty());
        assert!(!Translation::Numerus(vec![String::new(), "x".into()]).is_empty());
    }

    #[test]
    fn test_servable_message() {
        let msg = Message::new("Drop").with_translation("Jeter");
        assert!(msg.is_servable());

        let unfinished_empty =
            Message::new("Drop").with_status(TranslationStatus::Unfinished);
        assert!(!unfinished_empty.is_servable());

        let obsolete = Message::new("Drop")
            .with_translation("Jeter")
            .with_status(TranslationStatus::Obsolete);
        assert!(!obsolete.is_servable());
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new("../playinggamestate.cpp", 1641);
        assert_eq!(loc.to_string(), "../playinggamestate.cpp:1641");
    }
}
