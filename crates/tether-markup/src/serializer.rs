//! Markup serializer
//!
//! Writes a tree back to bytes. Character data is emitted in the escaped
//! form it was parsed in; attribute values are escaped on the way out.

use quick_xml::escape::partial_escape;

use crate::{MarkupTree, Node, NodeData, NodeId};

/// Walks the tree with an explicit stack of open nodes, so nesting depth is
/// bounded by heap, not by the call stack.
pub(crate) fn serialize(tree: &MarkupTree) -> Vec<u8> {
    let mut out = Vec::with_capacity(tree.len() * 32);
    let mut open: Vec<NodeId> = Vec::new();
    let mut next = tree.get(tree.root()).map(|n| n.first_child).unwrap_or(NodeId::NONE);

    loop {
        if let Some(node) = tree.get(next) {
            write_open(node, &mut out);
            if node.first_child.is_valid() {
                open.push(next);
                next = node.first_child;
            } else {
                next = node.next_sibling;
            }
            continue;
        }

        let Some(parent) = open.pop() else {
            break;
        };
        let Some(node) = tree.get(parent) else {
            break;
        };
        write_close(node, &mut out);
        next = node.next_sibling;
    }

    out
}

/// Everything up to the node's children; leaves are written whole
fn write_open(node: &Node, out: &mut Vec<u8>) {
    match &node.data {
        NodeData::Document => {}
        NodeData::Element(elem) => {
            out.push(b'<');
            out.extend_from_slice(elem.name.as_bytes());
            for attr in &elem.attrs {
                out.push(b' ');
                out.extend_from_slice(attr.name.as_bytes());
                out.extend_from_slice(b"=\"");
                write_attr_value(&attr.value, out);
                out.push(b'"');
            }
            if node.first_child.is_valid() {
                out.push(b'>');
            } else {
                out.extend_from_slice(b"/>");
            }
        }
        NodeData::Text(text) => out.extend_from_slice(text.as_bytes()),
        NodeData::CData(data) => {
            out.extend_from_slice(b"<![CDATA[");
            out.extend_from_slice(data.as_bytes());
            out.extend_from_slice(b"]]>");
        }
        NodeData::Comment(body) => {
            out.extend_from_slice(b"<!--");
            out.extend_from_slice(body.as_bytes());
            out.extend_from_slice(b"-->");
        }
        NodeData::Declaration(body) | NodeData::ProcessingInstruction(body) => {
            out.extend_from_slice(b"<?");
            out.extend_from_slice(body.as_bytes());
            out.extend_from_slice(b"?>");
        }
        NodeData::Doctype(body) => {
            out.extend_from_slice(b"<!DOCTYPE ");
            out.extend_from_slice(body.as_bytes());
            out.push(b'>');
        }
    }
}

/// End tag of an element whose children have been written
fn write_close(node: &Node, out: &mut Vec<u8>) {
    if let NodeData::Element(elem) = &node.data {
        out.extend_from_slice(b"</");
        out.extend_from_slice(elem.name.as_bytes());
        out.push(b'>');
    }
}

/// Values are always written double-quoted; apostrophes stay as they are
fn write_attr_value(value: &str, out: &mut Vec<u8>) {
    let escaped = partial_escape(value);
    if escaped.contains('"') {
        out.extend_from_slice(escaped.replace('"', "&quot;").as_bytes());
    } else {
        out.extend_from_slice(escaped.as_bytes());
    }
}
