use crate::catalog::{Catalog, Message};
use crate::search::MessageMatch;
use crate::tree::{NodeType, ReferenceTree, TreeNode};
use crate::SearchResult;

/// Builder for constructing reference trees from search results or catalogs
pub struct ReferenceTreeBuilder;

impl ReferenceTreeBuilder {
    /// Build a reference tree from search results
    ///
    /// - Root: search query text
    ///   - Catalog: catalog file
    ///     - Context: context name
    ///       - Message: matching message
    pub fn build(result: &SearchResult) -> ReferenceTree {
        let mut root = TreeNode::new(NodeType::Root, result.query.clone());

        for m in &result.matches {
            let file = m.file.display().to_string();
            if root.child_mut(NodeType::Catalog, &file).is_none() {
                root.add_child(TreeNode::new(NodeType::Catalog, file.clone()));
            }
            let Some(catalog_node) = root.child_mut(NodeType::Catalog, &file) else {
                continue;
            };

            if catalog_node.child_mut(NodeType::Context, &m.context).is_none() {
                catalog_node.add_child(TreeNode::new(NodeType::Context, m.context.clone()));
            }
            if let Some(context_node) = catalog_node.child_mut(NodeType::Context, &m.context) {
                context_node.add_child(Self::build_match_node(m));
            }
        }

        ReferenceTree::new(root)
    }

    /// Build a tree of a whole catalog, optionally limited to one context
    pub fn build_catalog(catalog: &Catalog, context_filter: Option<&str>) -> ReferenceTree {
        let mut root = TreeNode::new(NodeType::Catalog, catalog.origin().display().to_string());

        for context in &catalog.contexts {
            if context_filter.is_some_and(|name| name != context.name) {
                continue;
            }
            let mut context_node = TreeNode::new(NodeType::Context, context.name.clone());
            for message in &context.messages {
                context_node.add_child(Self::build_message_node(message));
            }
            root.add_child(context_node);
        }

        ReferenceTree::new(root)
    }

    fn build_message_node(message: &Message) -> TreeNode {
        let mut node = match message.primary_location() {
            Some(location) => TreeNode::with_location(
                NodeType::Message,
                message.source.clone(),
                location.clone(),
            ),
            None => TreeNode::new(NodeType::Message, message.source.clone()),
        };
        node.metadata = Some(message.translation.text().to_string());
        node.status = Some(message.status);
        node
    }

    fn build_match_node(m: &MessageMatch) -> TreeNode {
        let mut node = match &m.location {
            Some(location) => {
                TreeNode::with_location(NodeType::Message, m.source.clone(), location.clone())
            }
            None => TreeNode::new(NodeType::Message, m.source.clone()),
        };
        node.metadata = Some(m.translation.clone());
        node.status = Some(m.status);
        node
    }
}
