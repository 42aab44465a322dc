use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::message::{Message, Translation};
use super::store::Catalog;
use crate::error::Result;

/// Serializes a catalog back to `.ts` XML in the layout lupdate writes
pub struct TsWriter;

impl TsWriter {
    pub fn write_file(catalog: &Catalog, path: &Path) -> Result<()> {
        fs::write(path, Self::to_string(catalog))?;
        Ok(())
    }

    pub fn to_string(catalog: &Catalog) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS");
        if let Some(version) = &catalog.version {
            let _ = write!(out, " version=\"{}\"", escape(version));
        }
        if let Some(language) = &catalog.language {
            let _ = write!(out, " language=\"{}\"", escape(language));
        }
        if let Some(source_language) = &catalog.source_language {
            let _ = write!(out, " sourcelanguage=\"{}\"", escape(source_language));
        }
        out.push_str(">\n");

        for context in &catalog.contexts {
            out.push_str("<context>\n");
            let _ = writeln!(out, "    <name>{}</name>", escape(&context.name));
            if let Some(comment) = &context.comment {
                let _ = writeln!(out, "    <comment>{}</comment>", escape(comment));
            }
            for message in &context.messages {
                write_message(&mut out, message);
            }
            out.push_str("</context>\n");
        }

        out.push_str("</TS>\n");
        out
    }
}

fn write_message(out: &mut String, message: &Message) {
    out.push_str("    <message");
    if let Some(id) = &message.id {
        let _ = write!(out, " id=\"{}\"", escape(id));
    }
    if message.numerus {
        out.push_str(" numerus=\"yes\"");
    }
    out.push_str(">\n");

    for location in &message.locations {
        let _ = writeln!(
            out,
            "        <location filename=\"{}\" line=\"{}\"/>",
            escape(&*location.filename.to_string_lossy()),
            location.line
        );
    }
    let _ = writeln!(out, "        <source>{}</source>", escape(&message.source));
    if let Some(comment) = &message.comment {
        let _ = writeln!(out, "        <comment>{}</comment>", escape(comment));
    }
    if let Some(extra) = &message.extra_comment {
        let _ = writeln!(out, "        <extracomment>{}</extracomment>", escape(extra));
    }
    if let Some(note) = &message.translator_comment {
        let _ = writeln!(
            out,
            "        <translatorcomment>{}</translatorcomment>",
            escape(note)
        );
    }

    out.push_str("        <translation");
    if let Some(kind) = message.status.as_attr() {
        let _ = write!(out, " type=\"{kind}\"");
    }
    out.push('>');
    match &message.translation {
        Translation::Single(text) => out.push_str(&escape(text)),
        Translation::Numerus(forms) => {
            out.push('\n');
            for form in forms {
                let _ = writeln!(
                    out,
                    "            <numerusform>{}</numerusform>",
                    escape(form)
                );
            }
            out.push_str("        ");
        }
    }
    out.push_str("</translation>\n");
    out.push_str("    </message>\n");
}
