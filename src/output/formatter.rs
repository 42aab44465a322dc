use crate::catalog::TranslationStatus;
use crate::tree::{NodeType, ReferenceTree, TreeNode};

/// Renders catalog trees as indented text
pub struct TreeFormatter {
    max_width: usize,
}

impl TreeFormatter {
    /// 80 columns
    pub fn new() -> Self {
        Self { max_width: 80 }
    }

    pub fn with_width(max_width: usize) -> Self {
        Self { max_width }
    }

    /// Render the tree with box-drawing connectors
    pub fn format(&self, tree: &ReferenceTree) -> String {
        let mut output = String::new();
        self.format_node(&tree.root, &mut output, "", true, true);
        output
    }

    fn format_node(
        &self,
        node: &TreeNode,
        output: &mut String,
        prefix: &str,
        is_last: bool,
        is_root: bool,
    ) {
        if !is_root {
            output.push_str(prefix);
            output.push_str(if is_last { "└─> " } else { "├─> " });
        }

        output.push_str(&self.format_content(node));

        if let Some(location) = &node.location {
            output.push_str(&format!(" ({location})"));
        }

        output.push('\n');

        let child_count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            let is_last_child = i == child_count - 1;
            let child_prefix = if is_root {
                String::new()
            } else {
                format!("{}{}   ", prefix, if is_last { " " } else { "│" })
            };

            self.format_node(child, output, &child_prefix, is_last_child, false);
        }
    }

    /// Label for one node, e.g. `Context: ItemsWindow`
    fn format_content(&self, node: &TreeNode) -> String {
        match node.node_type {
            NodeType::Root => format!("'{}' (search query)", node.content),
            NodeType::Catalog => format!("Catalog: {}", node.content),
            NodeType::Context => format!("Context: {}", node.content),
            NodeType::Message => {
                let budget = self.max_width.saturating_sub(30) / 2;
                let source = self.truncate(&single_line(&node.content), budget);
                let translation = match (node.status, node.metadata.as_deref()) {
                    (Some(TranslationStatus::Unfinished), Some("") | None) => {
                        "(unfinished)".to_string()
                    }
                    (Some(status), _) if status.is_retired() => format!("({status})"),
                    (_, Some(text)) => format!("\"{}\"", self.truncate(&single_line(text), budget)),
                    (_, None) => String::new(),
                };
                format!("\"{source}\" => {translation}")
            }
        }
    }

    /// Truncate a string to at most `max_len` characters
    fn truncate(&self, s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}

/// Collapse embedded newlines so each message stays on one line
fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}
