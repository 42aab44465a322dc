use crate::SearchResult;

/// Formatter for simple, machine-readable output (grep-compatible)
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// One line per match: `catalog:line:context: source => translation`.
    /// Newlines inside texts are written as `\n`.
    pub fn format(&self, result: &SearchResult) -> String {
        let mut output = String::new();

        for m in &result.matches {
            let line = format!(
                "{}:{}:{}: {} => {}",
                m.file.display(),
                m.line(),
                m.context,
                escape_newlines(&m.source),
                escape_newlines(&m.translation)
            );
            output.push_str(&line);
            output.push('\n');
        }

        output
    }
}

fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n")
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}
