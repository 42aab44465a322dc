pub mod builder;
pub mod node;

pub use builder::ReferenceTreeBuilder;
pub use node::{NodeType, ReferenceTree, TreeNode};
