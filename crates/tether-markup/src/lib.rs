//! tether Markup
//!
//! In-memory tree for screen documents: parse bytes, edit attributes,
//! serialize back. Built on quick-xml.

mod node;
mod parser;
mod serializer;
mod tree;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Children, Descendants, MarkupTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Invalid/null node ID
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Markup parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Unclosed tag: {tag}")]
    UnclosedTag { tag: String },

    #[error("Unexpected end tag: {tag}")]
    UnexpectedEndTag { tag: String },

    #[error("Invalid encoding: {0}")]
    Encoding(String),

    #[error("No root element")]
    NoRootElement,
}

impl MarkupTree {
    /// Parse a document into a tree
    pub fn parse(bytes: &[u8]) -> Result<MarkupTree, ParseError> {
        parser::parse(bytes)
    }

    /// Serialize the tree back to bytes
    pub fn serialize(&self) -> Vec<u8> {
        serializer::serialize(self)
    }
}
