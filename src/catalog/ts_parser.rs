use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::message::{Context, Location, Message, Translation, TranslationStatus};
use super::store::Catalog;
use crate::error::{CatalogError, Result};

/// Parser for Qt Linguist `.ts` catalogs
pub struct TsParser;

impl TsParser {
    pub fn parse_file(path: &Path) -> Result<Catalog> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::parse_str(&content, path)?;
        debug!(
            file = %path.display(),
            contexts = catalog.contexts.len(),
            messages = catalog.len(),
            "parsed catalog"
        );
        Ok(catalog)
    }

    /// Parse catalog XML. `origin` is only used for error messages and
    /// [`Catalog::origin`].
    pub fn parse_str(xml: &str, origin: impl Into<PathBuf>) -> Result<Catalog> {
        let origin = origin.into();
        let mut reader = Reader::from_str(xml);
        let mut state = ParseState::default();

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event()
                .map_err(|e| CatalogError::parse(&origin, position, e.to_string()))?;

            let step = match event {
                Event::Start(ref e) => state.open(e, false),
                Event::Empty(ref e) => state.open(e, true),
                Event::End(ref e) => state.close(e.name().as_ref()),
                Event::Text(ref e) => {
                    if state.collecting() {
                        let text = e
                            .unescape()
                            .map_err(|e| CatalogError::parse(&origin, position, e.to_string()))?;
                        state.text.push_str(&text);
                    }
                    Ok(())
                }
                Event::CData(ref e) => {
                    if state.collecting() {
                        state.text.push_str(&String::from_utf8_lossy(e));
                    }
                    Ok(())
                }
                Event::Eof => {
                    let open = if state.context.is_some() || state.message.is_some() {
                        Some("context")
                    } else if state.seen_root && !state.root_closed {
                        Some("TS")
                    } else {
                        None
                    };
                    if let Some(element) = open {
                        return Err(CatalogError::parse(
                            &origin,
                            position,
                            format!("unexpected end of document inside <{element}>"),
                        ));
                    }
                    break;
                }
                _ => Ok(()),
            };
            step.map_err(|reason| CatalogError::parse(&origin, position, reason))?;
        }

        if !state.seen_root {
            return Err(CatalogError::parse(
                &origin,
                0,
                "missing <TS> root element",
            ));
        }

        let mut catalog = Catalog::from_contexts(origin, state.contexts);
        catalog.language = state.language;
        catalog.source_language = state.source_language;
        catalog.version = state.version;
        Ok(catalog)
    }
}

/// Accumulates contexts while walking the event stream
#[derive(Default)]
struct ParseState {
    seen_root: bool,
    root_closed: bool,
    language: Option<String>,
    source_language: Option<String>,
    version: Option<String>,
    contexts: Vec<Context>,
    context: Option<Context>,
    message: Option<Message>,
    source_seen: bool,
    /// Previous location; lupdate omits repeated filenames
    last_location: Option<Location>,
    /// Element whose text is being collected
    field: Option<Field>,
    text: String,
    /// `<lengthvariant>` children seen in the current field; only the first is kept
    variants: usize,
    in_variant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

impl Field {
    fn element(self) -> &'static [u8] {
        match self {
            Self::Name => b"name",
            Self::Source => b"source",
            Self::Comment => b"comment",
            Self::ExtraComment => b"extracomment",
            Self::TranslatorComment => b"translatorcomment",
            Self::Translation => b"translation",
            Self::NumerusForm => b"numerusform",
        }
    }
}

type Step = std::result::Result<(), String>;

fn attr(e: &BytesStart<'_>, name: &str) -> std::result::Result<Option<String>, String> {
    match e.try_get_attribute(name).map_err(|e| e.to_string())? {
        Some(a) => a
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

impl ParseState {
    fn collecting(&self) -> bool {
        self.field.is_some() && (self.variants == 0 || (self.in_variant && self.variants == 1))
    }

    /// Start collecting text for `field`. Self-closing elements stay empty.
    fn begin(&mut self, field: Field, empty: bool) {
        self.text.clear();
        self.variants = 0;
        self.in_variant = false;
        self.field = if empty { None } else { Some(field) };
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Step {
        match e.name().as_ref() {
            b"TS" => {
                self.seen_root = true;
                self.version = attr(e, "version")?;
                self.language = attr(e, "language")?;
                self.source_language = attr(e, "sourcelanguage")?;
            }
            b"context" => {
                self.context = Some(Context::default());
            }
            b"name" if self.context.is_some() && self.message.is_none() => {
                self.begin(Field::Name, empty);
            }
            b"message" => {
                if self.context.is_none() {
                    return Err("<message> outside of <context>".to_string());
                }
                let mut message = Message::default();
                message.numerus = attr(e, "numerus")?.as_deref() == Some("yes");
                message.id = attr(e, "id")?;
                self.message = Some(message);
                self.source_seen = false;
            }
            b"location" => self.open_location(e)?,
            b"source" if self.message.is_some() => {
                self.source_seen = true;
                self.begin(Field::Source, empty);
            }
            b"comment" if self.context.is_some() => self.begin(Field::Comment, empty),
            b"extracomment" if self.message.is_some() => self.begin(Field::ExtraComment, empty),
            b"translatorcomment" if self.message.is_some() => {
                self.begin(Field::TranslatorComment, empty)
            }
            b"translation" if self.message.is_some() => {
                let status = match attr(e, "type")? {
                    Some(value) => TranslationStatus::from_attr(&value)
                        .ok_or_else(|| format!("unknown translation type \"{value}\""))?,
                    None => TranslationStatus::Finished,
                };
                let numerus = self.message.as_ref().is_some_and(|m| m.numerus);
                if let Some(message) = self.message.as_mut() {
                    message.status = status;
                    if numerus {
                        message.translation = Translation::Numerus(Vec::new());
                    }
                }
                if !numerus {
                    self.begin(Field::Translation, empty);
                }
            }
            b"numerusform" if self.message.is_some() => {
                if let Some(Message {
                    translation: Translation::Numerus(forms),
                    ..
                }) = self.message.as_mut()
                {
                    forms.push(String::new());
                }
                self.begin(Field::NumerusForm, empty);
            }
            b"byte" if self.collecting() => {
                let value = attr(e, "value")?.unwrap_or_default();
                self.text.push(decode_byte(&value)?);
            }
            b"lengthvariant" if self.field.is_some() => {
                // Text around the variants is indentation
                if self.variants == 0 {
                    self.text.clear();
                }
                self.variants += 1;
                self.in_variant = !empty;
            }
            other => {
                debug!(element = %String::from_utf8_lossy(other), "skipping element");
            }
        }
        Ok(())
    }

    fn open_location(&mut self, e: &BytesStart<'_>) -> Step {
        let Some(message) = self.message.as_mut() else {
            return Ok(());
        };

        let previous = self.last_location.as_ref();
        let filename = match attr(e, "filename")? {
            Some(f) => PathBuf::from(f),
            None => previous.map(|l| l.filename.clone()).unwrap_or_default(),
        };
        let line = match attr(e, "line")? {
            Some(raw) => parse_line(&raw, previous.map(|l| l.line))?,
            None => 0,
        };

        let location = Location::new(filename, line);
        message.locations.push(location.clone());
        self.last_location = Some(location);
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Step {
        match name {
            b"TS" => {
                self.root_closed = true;
                return Ok(());
            }
            b"lengthvariant" => {
                self.in_variant = false;
                return Ok(());
            }
            b"context" => {
                if let Some(context) = self.context.take() {
                    self.contexts.push(context);
                }
                return Ok(());
            }
            b"message" => {
                let Some(message) = self.message.take() else {
                    return Ok(());
                };
                if !self.source_seen {
                    return Err("<message> without <source>".to_string());
                }
                if let Some(context) = self.context.as_mut() {
                    context.messages.push(message);
                }
                return Ok(());
            }
            _ => {}
        }

        // Children such as <byte> or unknown elements leave the field open
        let field = match self.field {
            Some(field) if field.element() == name => self.field.take(),
            _ => return Ok(()),
        };
        let text = std::mem::take(&mut self.text);
        self.variants = 0;

        match field {
            Some(Field::Name) => {
                if let Some(context) = self.context.as_mut() {
                    context.name = text;
                }
            }
            Some(Field::Comment) => match (self.message.as_mut(), self.context.as_mut()) {
                (Some(message), _) => message.comment = Some(text),
                (None, Some(context)) => context.comment = Some(text),
                _ => {}
            },
            Some(field) => {
                if let Some(message) = self.message.as_mut() {
                    match field {
                        Field::Source => message.source = text,
                        Field::ExtraComment => message.extra_comment = Some(text),
                        Field::TranslatorComment => message.translator_comment = Some(text),
                        Field::Translation => message.translation = Translation::Single(text),
                        Field::NumerusForm => {
                            if let Translation::Numerus(forms) = &mut message.translation {
                                if let Some(last) = forms.last_mut() {
                                    *last = text;
                                }
                            }
                        }
                        Field::Name | Field::Comment => {}
                    }
                }
            }
            None => {}
        }
        Ok(())
    }
}

/// Parse a `line` attribute. `+N` is relative to the previous location.
fn parse_line(raw: &str, previous: Option<i64>) -> std::result::Result<i64, String> {
    let invalid = |_| format!("invalid line number \"{raw}\"");
    match raw.strip_prefix('+') {
        Some(delta) => {
            let delta: i64 = delta.trim().parse().map_err(invalid)?;
            previous
                .unwrap_or(0)
                .checked_add(delta)
                .ok_or_else(|| format!("invalid line number \"{raw}\""))
        }
        None => raw.trim().parse().map_err(invalid),
    }
}

/// Decode a `<byte value="x9"/>` escape: hex with an `x` prefix, decimal otherwise
fn decode_byte(value: &str) -> std::result::Result<char, String> {
    let code = match value.strip_prefix('x').or_else(|| value.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    code.ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid byte value \"{value}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.0" language="fr_FR">
<context>
    <name>ItemsPickerWindow</name>
    <message>
        <location filename="../playinggamestate.cpp" line="1245"/>
        <source>Pick up the selected item (Space)</source>
        <translation>Prendre l&apos;objet sélectionné (Espace)</translation>
    </message>
    <message>
        <location filename="../playinggamestate.cpp" line="1397"/>
        <source>statistics that you wish to improve:</source>
        <translation type="unfinished"></translation>
    </message>
</context>
<context>
    <name>ItemsWindow</name>
    <message>
        <location filename="../rpg/item.cpp" line="120"/>
        <source>Armour</source>
        <comment>Armour</comment>
        <translation>Armure</translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn test_parse_sample() {
        let catalog = TsParser::parse_str(SAMPLE, "erebus_fr.ts").unwrap();
        assert_eq!(catalog.language.as_deref(), Some("fr_FR"));
        assert_eq!(catalog.version.as_deref(), Some("2.0"));
        assert_eq!(catalog.contexts.len(), 2);
        assert_eq!(catalog.len(), 3);

        let picker = &catalog.contexts[0];
        assert_eq!(picker.name, "ItemsPickerWindow");
        let first = &picker.messages[0];
        assert_eq!(first.translation.text(), "Prendre l'objet sélectionné (Espace)");
        assert_eq!(first.status, TranslationStatus::Finished);
        assert_eq!(
            first.locations,
            vec![Location::new("../playinggamestate.cpp", 1245)]
        );

        let second = &picker.messages[1];
        assert_eq!(second.status, TranslationStatus::Unfinished);
        assert!(second.translation.is_empty());
    }

    #[test]
    fn test_comment_is_attached_to_message() {
        let catalog = TsParser::parse_str(SAMPLE, "erebus_fr.ts").unwrap();
        let armour = catalog.find("ItemsWindow", "Armour", Some("Armour")).unwrap();
        assert_eq!(armour.translation.text(), "Armure");
    }

    #[test]
    fn test_multiline_text_is_kept_verbatim() {
        let xml = "<TS><context><name>C</name><message>\
                   <source>Line one\n\nLine two </source>\
                   <translation>Ligne un\n\nLigne deux </translation>\
                   </message></context></TS>";
        let catalog = TsParser::parse_str(xml, "m.ts").unwrap();
        let msg = &catalog.contexts[0].messages[0];
        assert_eq!(msg.source, "Line one\n\nLine two ");
        assert_eq!(msg.translation.text(), "Ligne un\n\nLigne deux ");
    }

    #[test]
    fn test_numerus_forms() {
        let xml = r#"<TS language="fr"><context><name>TradeWindow</name>
            <message numerus="yes">
                <source>%n gold</source>
                <translation>
                    <numerusform>%n pièce</numerusform>
                    <numerusform>%n pièces</numerusform>
                </translation>
            </message></context></TS>"#;
        let catalog = TsParser::parse_str(xml, "n.ts").unwrap();
        let msg = &catalog.contexts[0].messages[0];
        assert!(msg.numerus);
        assert_eq!(
            msg.translation,
            Translation::Numerus(vec!["%n pièce".into(), "%n pièces".into()])
        );
    }

    #[test]
    fn test_relative_and_inherited_locations() {
        let xml = r#"<TS><context><name>C</name>
            <message><location filename="../game.cpp" line="100"/><source>a</source></message>
            <message><location line="+5"/><source>b</source></message>
            </context></TS>"#;
        let catalog = TsParser::parse_str(xml, "r.ts").unwrap();
        let b = &catalog.contexts[0].messages[1];
        assert_eq!(b.locations, vec![Location::new("../game.cpp", 105)]);
    }

    #[test]
    fn test_negative_line_is_kept() {
        let xml = r#"<TS><context><name>C</name>
            <message><location filename="a.cpp" line="-3"/><source>a</source></message>
            </context></TS>"#;
        let catalog = TsParser::parse_str(xml, "neg.ts").unwrap();
        assert_eq!(catalog.contexts[0].messages[0].locations[0].line, -3);
    }

    #[test]
    fn test_obsolete_and_vanished() {
        let xml = r#"<TS><context><name>C</name>
            <message><source>a</source><translation type="obsolete">x</translation></message>
            <message><source>b</source><translation type="vanished">y</translation></message>
            </context></TS>"#;
        let catalog = TsParser::parse_str(xml, "o.ts").unwrap();
        let statuses: Vec<_> = catalog.messages().map(|(_, m)| m.status).collect();
        assert_eq!(
            statuses,
            vec![TranslationStatus::Obsolete, TranslationStatus::Vanished]
        );
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<TS><context><name>C</name>
            <message><source>a</source><oldsource>old</oldsource>
            <translation>b</translation></message></context></TS>"#;
        let catalog = TsParser::parse_str(xml, "u.ts").unwrap();
        assert_eq!(catalog.translate("C", "a", None), Some("b"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<TS><context><name>C</name><message><source>a</translation></message>";
        let err = TsParser::parse_str(xml, "bad.ts").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("bad.ts"));
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let err = TsParser::parse_str("<TS><context><name>C</name>", "t.ts").unwrap_err();
        assert!(err.to_string().contains("unexpected end of document"));
    }

    #[test]
    fn test_unclosed_root_is_an_error() {
        let err = TsParser::parse_str(
            "<?xml version=\"1.0\"?><TS version=\"2.0\" language=\"fr\">",
            "t.ts",
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("unexpected end of document inside <TS>"));

        let err = TsParser::parse_str("<TS><context><name>C</name></context>", "t.ts").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_byte_escapes_are_decoded() {
        let xml = r#"<TS><context><name>C</name><message>
            <source>Tab<byte value="x9"/>here</source>
            <translation>Onglet<byte value="x9"/>ici<byte value="10"/></translation>
            </message></context></TS>"#;
        let catalog = TsParser::parse_str(xml, "b.ts").unwrap();
        let msg = &catalog.contexts[0].messages[0];
        assert_eq!(msg.source, "Tab\there");
        assert_eq!(msg.translation.text(), "Onglet\tici\n");
        assert_eq!(catalog.translate("C", "Tab\there", None), Some("Onglet\tici\n"));
    }

    #[test]
    fn test_bad_byte_value_is_an_error() {
        let xml = r#"<TS><context><name>C</name><message>
            <source>a<byte value="xZZ"/></source></message></context></TS>"#;
        let err = TsParser::parse_str(xml, "b.ts").unwrap_err();
        assert!(err.to_string().contains("invalid byte value"));
    }

    #[test]
    fn test_length_variants_keep_the_first() {
        let xml = r#"<TS><context><name>C</name><message>
            <source>Quit current game</source>
            <translation variants="yes">
                <lengthvariant>Quitter la partie en cours</lengthvariant>
                <lengthvariant>Quitter</lengthvariant>
            </translation>
            </message></context></TS>"#;
        let catalog = TsParser::parse_str(xml, "v.ts").unwrap();
        assert_eq!(
            catalog.translate("C", "Quit current game", None),
            Some("Quitter la partie en cours")
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = TsParser::parse_str("<xliff/>", "x.ts").unwrap_err();
        assert!(err.to_string().contains("missing <TS> root element"));
    }

    #[test]
    fn test_message_without_source_is_an_error() {
        let xml = "<TS><context><name>C</name><message><translation>x</translation></message></context></TS>";
        let err = TsParser::parse_str(xml, "s.ts").unwrap_err();
        assert!(err.to_string().contains("without <source>"));
    }

    #[test]
    fn test_bad_type_attribute_is_an_error() {
        let xml = r#"<TS><context><name>C</name><message><source>a</source><translation type="done">x</translation></message></context></TS>"#;
        let err = TsParser::parse_str(xml, "t.ts").unwrap_err();
        assert!(err.to_string().contains("unknown translation type"));
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("12", None), Ok(12));
        assert_eq!(parse_line("+3", Some(10)), Ok(13));
        assert_eq!(parse_line("-4", Some(10)), Ok(-4));
        assert!(parse_line("twelve", None).is_err());
        assert!(parse_line("+9223372036854775807", Some(10)).is_err());
    }
}
