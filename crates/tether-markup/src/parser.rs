//! Markup parser
//!
//! Streams quick-xml events into a `MarkupTree`. The reader checks end-tag
//! names; unclosed elements at EOF and documents without any element are
//! rejected here.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{Attribute, ElementData, MarkupTree, NodeData, NodeId, ParseError};

pub(crate) fn parse(bytes: &[u8]) -> Result<MarkupTree, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().check_end_names = true;

    let mut tree = MarkupTree::new();
    let mut stack: Vec<NodeId> = Vec::with_capacity(16);
    let mut buf = Vec::with_capacity(256);

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ParseError::Syntax {
                position: reader.error_position(),
                message: e.to_string(),
            })?;
        let parent = stack.last().copied().unwrap_or(NodeId::ROOT);

        match event {
            Event::Start(e) => {
                let elem = element_from_start(&reader, &e)?;
                let id = tree.create(NodeData::Element(elem));
                tree.append_child(parent, id);
                stack.push(id);
            }
            Event::Empty(e) => {
                let elem = element_from_start(&reader, &e)?;
                let id = tree.create(NodeData::Element(elem));
                tree.append_child(parent, id);
            }
            Event::End(e) => {
                if stack.pop().is_none() {
                    return Err(ParseError::UnexpectedEndTag {
                        tag: utf8(e.name().as_ref())?,
                    });
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(encoding)?;
                append_text(&mut tree, parent, &text);
            }
            Event::GeneralRef(e) => {
                // Kept as a reference so serialization reproduces it verbatim
                let name = e.decode().map_err(encoding)?;
                append_text(&mut tree, parent, &format!("&{};", name));
            }
            Event::CData(e) => {
                let data = e.decode().map_err(encoding)?;
                let id = tree.create(NodeData::CData(data.into_owned()));
                tree.append_child(parent, id);
            }
            Event::Comment(e) => {
                let body = e.decode().map_err(encoding)?;
                let id = tree.create(NodeData::Comment(body.into_owned()));
                tree.append_child(parent, id);
            }
            Event::Decl(e) => {
                let id = tree.create(NodeData::Declaration(utf8(&e)?));
                tree.append_child(parent, id);
            }
            Event::PI(e) => {
                let id = tree.create(NodeData::ProcessingInstruction(utf8(&e)?));
                tree.append_child(parent, id);
            }
            Event::DocType(e) => {
                let body = e.decode().map_err(encoding)?;
                let id = tree.create(NodeData::Doctype(body.trim().to_string()));
                tree.append_child(parent, id);
            }
            Event::Eof => break,
        }

        buf.clear();
    }

    if let Some(&open) = stack.last() {
        let tag = tree.element(open).map(|e| e.name.clone()).unwrap_or_default();
        return Err(ParseError::UnclosedTag { tag });
    }

    if tree.root_element().is_none() {
        return Err(ParseError::NoRootElement);
    }

    tracing::trace!("Parsed {} markup nodes", tree.len());
    Ok(tree)
}

/// Build element data from a start tag, unescaping attribute values
fn element_from_start(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<ElementData, ParseError> {
    let mut elem = ElementData::new(utf8(e.name().as_ref())?);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Syntax {
            position: reader.buffer_position(),
            message: err.to_string(),
        })?;
        let name = utf8(attr.key.as_ref())?;
        let raw = utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(&raw).map_err(|err| ParseError::Syntax {
            position: reader.buffer_position(),
            message: err.to_string(),
        })?;

        elem.attrs.push(Attribute {
            name,
            value: value.into_owned(),
        });
    }

    Ok(elem)
}

/// Append character data, merging with a preceding text node
fn append_text(tree: &mut MarkupTree, parent: NodeId, text: &str) {
    let last = tree.get(parent).map(|p| p.last_child).unwrap_or(NodeId::NONE);
    if let Some(node) = tree.get_mut(last) {
        if let NodeData::Text(existing) = &mut node.data {
            existing.push_str(text);
            return;
        }
    }

    let id = tree.create(NodeData::Text(text.to_string()));
    tree.append_child(parent, id);
}

fn utf8(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ParseError::Encoding(e.to_string()))
}

fn encoding(err: impl std::fmt::Display) -> ParseError {
    ParseError::Encoding(err.to_string())
}
