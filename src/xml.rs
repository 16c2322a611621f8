//! Namespace-aware element tree read with quick-xml.
//!
//! USLM is mixed content: sections interleave text with inline markup, so the
//! tree keeps text nodes in place. Nesting depth is capped while reading so the
//! recursive walks over the tree stay bounded.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::Error;

/// Hard ceiling on element nesting, whatever the configured depth. The
/// structural parser, the index walk, and dropping the tree all recurse
/// once per level.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// A parsed XML document.
#[derive(Debug)]
pub struct Document {
    /// The document element.
    pub root: Element,
}

/// One element with its resolved namespace.
#[derive(Debug, Default)]
pub struct Element {
    /// Attributes by qualified name, in source order. Namespace declarations are dropped.
    pub attributes: Vec<(String, String)>,
    /// Child elements and text in document order.
    pub children: Vec<XmlNode>,
    /// Local name without prefix.
    pub local_name: String,
    /// Namespace URI the prefix resolved to.
    pub namespace: Option<String>,
}

/// Element content.
#[derive(Debug)]
pub enum XmlNode {
    /// A nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
}

impl Document {
    /// Read `text` into an element tree.
    ///
    /// `file` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns `Error::XmlMalformed` when the reader rejects the input, the
    /// document has no element or more than one, or elements are left open;
    /// `Error::TooDeep` when nesting exceeds `max_depth` (never more than
    /// `MAX_DEPTH_LIMIT`).
    pub fn parse(file: &str, text: &str, max_depth: usize) -> Result<Self, Error> {
        let max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        let mut reader = NsReader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (ns, event) = reader
                .read_resolved_event()
                .map_err(|e| return Error::malformed(file, e))?;
            match event {
                Event::Start(start) => {
                    if stack.len() >= max_depth {
                        return Err(Error::TooDeep { file: file.to_string(), max_depth });
                    }
                    stack.push(open_element(file, &ns, &start)?);
                },
                Event::Empty(start) => {
                    let element = open_element(file, &ns, &start)?;
                    attach(file, &mut stack, &mut root, element)?;
                },
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        return Err(Error::malformed(file, "closing tag without an open element"));
                    };
                    attach(file, &mut stack, &mut root, element)?;
                },
                Event::Text(raw) => {
                    let content = raw.unescape().map_err(|e| return Error::malformed(file, e))?;
                    push_text(&mut stack, &content);
                },
                Event::CData(raw) => {
                    let content = String::from_utf8_lossy(&raw.into_inner()).into_owned();
                    push_text(&mut stack, &content);
                },
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::DocType(_) | Event::PI(_) => {},
            }
        }

        if !stack.is_empty() {
            return Err(Error::malformed(file, "unexpected end of document"));
        }
        let Some(root) = root else {
            return Err(Error::malformed(file, "no root element"));
        };
        return Ok(Self { root });
    }
}

/// Build an element from a start tag, resolving its namespace and attributes.
///
/// # Errors
///
/// Returns `Error::XmlMalformed` for unreadable attributes.
fn open_element(file: &str, ns: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, Error> {
    let namespace = match ns {
        ResolveResult::Bound(uri) => Some(String::from_utf8_lossy(uri.0).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    };
    let local_name = String::from_utf8_lossy(start.local_name().into_inner()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| return Error::malformed(file, e))?;
        let key = String::from_utf8_lossy(attr.key.into_inner()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr.unescape_value().map_err(|e| return Error::malformed(file, e))?;
        attributes.push((key, value.into_owned()));
    }

    return Ok(Element { attributes, children: Vec::new(), local_name, namespace });
}

/// Hang a finished element on its parent, or make it the document element.
///
/// # Errors
///
/// Returns `Error::XmlMalformed` if a second top-level element appears.
fn attach(
    file: &str,
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::malformed(file, "more than one root element"));
    }
    *root = Some(element);
    return Ok(());
}

/// Append character data to the open element. Text outside the root is ignored.
fn push_text(stack: &mut [Element], content: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(XmlNode::Text(existing)) = parent.children.last_mut() {
        existing.push_str(content);
        return;
    }
    parent.children.push(XmlNode::Text(content.to_string()));
}

impl Element {
    /// Value of an attribute by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        return self
            .attributes
            .iter()
            .find(|(key, _)| return key == name)
            .map(|(_, value)| return value.as_str());
    }

    /// Whether this element is `namespace`:`local_name`.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        return self.local_name == local_name && self.namespace.as_deref() == Some(namespace);
    }

    /// Direct element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        return self.children.iter().filter_map(|node| {
            return match node {
                XmlNode::Element(element) => Some(element),
                XmlNode::Text(_) => None,
            };
        });
    }

    /// First direct child element named `namespace`:`local_name`.
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        return self.elements().find(|e| return e.is(namespace, local_name));
    }

    /// This element and all of its descendants, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        return Descendants { stack: vec![self] };
    }

    /// Concatenated character data of the whole subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                XmlNode::Element(element) => stack.extend(element.children.iter().rev()),
                XmlNode::Text(text) => out.push_str(text),
            }
        }
        return out;
    }
}

/// Pre-order walk over an element subtree.
#[derive(Clone)]
pub struct Descendants<'a> {
    /// Elements still to visit, next on top.
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let children: Vec<&Element> = element.elements().collect();
        self.stack.extend(children.into_iter().rev());
        return Some(element);
    }
}
