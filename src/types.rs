/// Core domain types: structural nodes and catalog entries.
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Namespace of the United States Legislative Markup schema.
pub const USLM_NS: &str = "http://xml.house.gov/schemas/uslm/1.0";

/// Addressable subdivisions of the legislative hierarchy.
/// Anything else in a document is mixed content and never enters the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    /// `<appendix>`
    Appendix,
    /// `<article>`
    Article,
    /// `<chapter>`
    Chapter,
    /// `<compiledAct>`
    CompiledAct,
    /// `<division>`
    Division,
    /// `<part>`
    Part,
    /// `<section>`
    Section,
    /// `<subchapter>`
    Subchapter,
    /// `<subpart>`
    Subpart,
    /// `<subpart1>`, a legacy spelling of subpart found in older titles.
    Subpart1,
    /// `<subtitle>`
    Subtitle,
    /// `<title>`
    Title,
}

impl StructureKind {
    /// The element local name this kind is written as.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Appendix => "appendix",
            Self::Article => "article",
            Self::Chapter => "chapter",
            Self::CompiledAct => "compiledAct",
            Self::Division => "division",
            Self::Part => "part",
            Self::Section => "section",
            Self::Subchapter => "subchapter",
            Self::Subpart => "subpart",
            Self::Subpart1 => "subpart1",
            Self::Subtitle => "subtitle",
            Self::Title => "title",
        };
    }

    /// Recognize a structural element by local name. Case-sensitive, like XML.
    pub fn from_local_name(name: &str) -> Option<Self> {
        return match name {
            "appendix" => Some(Self::Appendix),
            "article" => Some(Self::Article),
            "chapter" => Some(Self::Chapter),
            "compiledAct" => Some(Self::CompiledAct),
            "division" => Some(Self::Division),
            "part" => Some(Self::Part),
            "section" => Some(Self::Section),
            "subchapter" => Some(Self::Subchapter),
            "subpart" => Some(Self::Subpart),
            "subpart1" => Some(Self::Subpart1),
            "subtitle" => Some(Self::Subtitle),
            "title" => Some(Self::Title),
            _ => None,
        };
    }
}

/// One addressable unit of a title. Built once by the parser, never mutated;
/// index paths share nodes with the tree through `Rc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralNode {
    /// Structural children in document order.
    pub children: Vec<Rc<StructuralNode>>,
    /// Direct `<heading>` text, trimmed. Empty when absent.
    pub heading: String,
    /// Stable `identifier` attribute, e.g. `/us/usc/t5/s101`. Empty when absent.
    pub identifier: String,
    /// Which structural element this node came from.
    pub kind: StructureKind,
    /// Direct `<num>` text as authored, e.g. `§ 101.`. Empty when absent.
    pub number: String,
}

impl StructuralNode {
    /// Count this node and every descendant.
    pub fn node_count(&self) -> usize {
        return self
            .children
            .iter()
            .map(|c| return c.node_count())
            .fold(1_usize, usize::saturating_add);
    }
}

/// Root-first chain of nodes ending at a resolved target.
pub type AncestorPath = Vec<Rc<StructuralNode>>;

/// One title in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMeta {
    /// Location of the XML relative to the library root, e.g. `usc/usc05.xml`.
    pub file: String,
    /// Display heading.
    #[serde(default)]
    pub heading: String,
    /// Stable identifier of the title document, when known.
    #[serde(default)]
    pub identifier: String,
    /// Short label such as `Title 5`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Display number as declared by the document, e.g. `5` or `50A`.
    #[serde(default)]
    pub number: String,
    /// Source content is a large-file-storage placeholder and cannot be read.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pointer: bool,
}
