//! Markup Node
//!
//! Nodes link to each other by `NodeId` inside the tree's arena.
//! Character data is kept in its escaped source form so that untouched text
//! serializes byte-for-byte; attribute values are held unescaped.

use crate::NodeId;

/// Markup node
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE for the document node)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a detached node
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get raw text if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content (escaped source form)
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment body
    Comment(String),
    /// `<?xml ...?>` declaration body
    Declaration(String),
    /// Processing instruction body
    ProcessingInstruction(String),
    /// DOCTYPE body
    Doctype(String),
}

/// Attribute with an unescaped value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name as written (prefix included)
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute value, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_keeps_order() {
        let mut elem = ElementData::new("lv_image");
        elem.set_attr("src", "a.png");
        elem.set_attr("align", "center");
        elem.set_attr("src", "img_1f");

        assert_eq!(elem.attr("src"), Some("img_1f"));
        assert_eq!(elem.attrs[0].name, "src");
        assert_eq!(elem.attrs.len(), 2);
    }

    #[test]
    fn test_node_accessors() {
        let node = Node::new(NodeData::Text("a &amp; b".into()));
        assert!(!node.is_element());
        assert_eq!(node.as_text(), Some("a &amp; b"));
        assert!(node.as_element().is_none());
    }
}
