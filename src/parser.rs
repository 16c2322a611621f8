//! Structural parser: from an element tree to the title's table-of-contents tree.

use std::rc::Rc;

use crate::error::Error;
use crate::types::{StructuralNode, StructureKind, USLM_NS};
use crate::xml::{Document, Element};

/// Build the structural tree of one document.
///
/// The search for the root tolerates any wrapper nesting: it starts at the
/// first USLM `<main>` (or the document element) and takes the first
/// structural element in document order. Below the root, only direct
/// structural children are kept; a non-structural child is dropped with
/// everything inside it.
///
/// # Errors
///
/// Returns `Error::NoStructuralRoot` if the document has no structural element.
pub fn parse_structure(file: &str, document: &Document) -> Result<StructuralNode, Error> {
    let (root, kind) = find_structural_root(document).ok_or_else(|| {
        return Error::NoStructuralRoot { file: file.to_string() };
    })?;
    return Ok(build_node(root, kind));
}

/// Locate the element the structural tree hangs from, with its kind.
pub fn find_structural_root(document: &Document) -> Option<(&Element, StructureKind)> {
    let start = document
        .root
        .descendants()
        .find(|e| return e.is(USLM_NS, "main"))
        .unwrap_or(&document.root);
    return start.descendants().find_map(|e| return structural_kind(e).map(|kind| return (e, kind)));
}

/// The structural kind of a USLM element, if it has one.
pub fn structural_kind(element: &Element) -> Option<StructureKind> {
    if element.namespace.as_deref() != Some(USLM_NS) {
        return None;
    }
    return StructureKind::from_local_name(&element.local_name);
}

/// Trimmed text of the first direct USLM child called `name`, or "".
pub fn direct_child_text(element: &Element, name: &str) -> String {
    return element
        .child(USLM_NS, name)
        .map(|c| return c.text_content().trim().to_string())
        .unwrap_or_default();
}

/// Recursively build a node. Sections are leaves; their markup is content, not navigation.
fn build_node(element: &Element, kind: StructureKind) -> StructuralNode {
    let children = if kind == StructureKind::Section {
        Vec::new()
    } else {
        element
            .elements()
            .filter_map(|child| {
                let child_kind = structural_kind(child)?;
                return Some(Rc::new(build_node(child, child_kind)));
            })
            .collect()
    };

    return StructuralNode {
        children,
        heading: direct_child_text(element, "heading"),
        identifier: element.attribute("identifier").unwrap_or_default().to_string(),
        kind,
        number: direct_child_text(element, "num"),
    };
}
