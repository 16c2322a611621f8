//! Human-readable labels for nodes, titles, and search results.

use crate::normalize::{clean_section_number, clean_whitespace};
use crate::types::{StructuralNode, TitleMeta};

/// `§ 101 Executive departments`, falling back to whichever part exists,
/// then to the element kind in capitals.
pub fn node_label(node: &StructuralNode) -> String {
    let number = node.number.trim_end_matches('—').trim();
    let heading = node.heading.trim();
    if !number.is_empty() && !heading.is_empty() {
        return format!("{number} {heading}");
    }
    if !heading.is_empty() {
        return heading.to_string();
    }
    if !number.is_empty() {
        return number.to_string();
    }
    return node.kind.as_str().to_uppercase();
}

/// Short name for a title in lists and notes.
pub fn title_display_label(meta: &TitleMeta) -> String {
    if !meta.label.is_empty() {
        return meta.label.clone();
    }
    if !meta.number.is_empty() {
        return format!("Title {}", meta.number);
    }
    if !meta.heading.is_empty() {
        return meta.heading.clone();
    }
    if !meta.file.is_empty() {
        return meta.file.clone();
    }
    return "Title".to_string();
}

/// `Title 5 — Government Organization and Employees`
pub fn title_full_label(meta: &TitleMeta) -> String {
    let number = clean_whitespace(&meta.number);
    let base = if number.is_empty() { String::new() } else { format!("Title {number}") };
    let heading = clean_whitespace(&meta.heading);
    let label = clean_whitespace(&meta.label);

    let detail = if heading.is_empty() { label } else { heading };
    if !base.is_empty() && !detail.is_empty() {
        return format!("{base} — {detail}");
    }
    if !detail.is_empty() {
        return detail;
    }
    if !base.is_empty() {
        return base;
    }
    return title_display_label(meta);
}

/// `§ 101 Executive departments` for a search hit; `Section` when unnumbered.
pub fn section_hit_label(number: &str, heading: &str) -> String {
    let number = clean_section_number(number);
    let number = if number.is_empty() { "Section".to_string() } else { number };
    let heading = clean_whitespace(heading);
    if heading.is_empty() {
        return number;
    }
    return format!("{number} {heading}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructureKind;

    fn node(kind: StructureKind, number: &str, heading: &str) -> StructuralNode {
        return StructuralNode {
            children: Vec::new(),
            heading: heading.to_string(),
            identifier: String::new(),
            kind,
            number: number.to_string(),
        };
    }

    fn meta(number: &str, heading: &str, label: &str) -> TitleMeta {
        return TitleMeta {
            file: "usc/usc05.xml".to_string(),
            heading: heading.to_string(),
            identifier: String::new(),
            label: label.to_string(),
            number: number.to_string(),
            pointer: false,
        };
    }

    #[test]
    fn node_labels() {
        assert_eq!(node_label(&node(StructureKind::Chapter, "CHAPTER 1—", "ORGANIZATION")), "CHAPTER 1 ORGANIZATION");
        assert_eq!(node_label(&node(StructureKind::Section, "§ 101.", "")), "§ 101.");
        assert_eq!(node_label(&node(StructureKind::Part, "", " Employees ")), "Employees");
        assert_eq!(node_label(&node(StructureKind::CompiledAct, "", "")), "COMPILEDACT");
    }

    #[test]
    fn title_labels() {
        assert_eq!(title_display_label(&meta("5", "", "Title 5")), "Title 5");
        assert_eq!(title_display_label(&meta("5", "", "")), "Title 5");
        assert_eq!(title_display_label(&meta("", "", "")), "usc/usc05.xml");
        assert_eq!(title_full_label(&meta("5", "GOVERNMENT  ORGANIZATION", "")), "Title 5 — GOVERNMENT ORGANIZATION");
        assert_eq!(title_full_label(&meta("5", "", "Title 5")), "Title 5 — Title 5");
        assert_eq!(title_full_label(&meta("", "Heading", "")), "Heading");
    }

    #[test]
    fn search_hit_labels() {
        assert_eq!(section_hit_label("§ 101.", "Executive  departments"), "§ 101 Executive departments");
        assert_eq!(section_hit_label("", ""), "Section");
    }
}
