use crate::catalog::{Location, TranslationStatus};

/// Level of a node: catalog > context > message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Root node: the search text or the catalog being shown
    Root,
    /// A catalog file
    Catalog,
    /// A context of a catalog (e.g., "ItemsWindow")
    Context,
    /// A message, with its translation in `metadata`
    Message,
}

/// One line of a rendered catalog tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub node_type: NodeType,
    pub content: String,
    pub location: Option<Location>,
    /// Translation text for message nodes
    pub metadata: Option<String>,
    /// Status for message nodes
    pub status: Option<TranslationStatus>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(node_type: NodeType, content: String) -> Self {
        Self {
            node_type,
            content,
            location: None,
            metadata: None,
            status: None,
            children: Vec::new(),
        }
    }

    /// Node pointing back at a source location
    pub fn with_location(node_type: NodeType, content: String, location: Location) -> Self {
        Self {
            location: Some(location),
            ..Self::new(node_type, content)
        }
    }

    pub fn add_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Nodes in this subtree, counting `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Depth of the deepest leaf; a lone node has depth 1
    pub fn max_depth(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            1 + self.children.iter().map(|c| c.max_depth()).max().unwrap_or(0)
        }
    }

    /// Find a direct child by type and content
    pub fn child_mut(&mut self, node_type: NodeType, content: &str) -> Option<&mut TreeNode> {
        self.children
            .iter_mut()
            .find(|c| c.node_type == node_type && c.content == content)
    }
}

/// A tree of catalogs, contexts and messages
#[derive(Debug)]
pub struct ReferenceTree {
    pub root: TreeNode,
}

impl ReferenceTree {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Empty tree rooted at the search text
    pub fn with_search_text(search_text: String) -> Self {
        Self {
            root: TreeNode::new(NodeType::Root, search_text),
        }
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn max_depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Whether anything hangs below the root
    pub fn has_results(&self) -> bool {
        self.root.has_children()
    }
}
