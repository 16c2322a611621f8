//! Deep links: `?t=<title>&s=<section>` query parameters.

use url::Url;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::normalize::section_key;
use crate::types::{StructuralNode, TitleMeta};

/// Base used to read links given as a bare query string.
const RELATIVE_BASE: &str = "http://localhost/";

/// Title and section named by a link. Either may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkState {
    /// Raw section parameter.
    pub section: Option<String>,
    /// Raw title parameter.
    pub title: Option<String>,
}

/// Link value for a title: its number without spaces, else identifier, else file.
pub fn title_location_value(meta: &TitleMeta) -> Option<String> {
    let compact: String = meta.number.chars().filter(|c| return !c.is_whitespace()).collect();
    if !compact.is_empty() {
        return Some(compact);
    }
    if !meta.identifier.is_empty() {
        return Some(meta.identifier.clone());
    }
    if !meta.file.is_empty() {
        return Some(meta.file.clone());
    }
    return None;
}

/// Link value for a section: its normalized number, else its identifier.
pub fn section_location_value(node: &StructuralNode) -> Option<String> {
    let key = section_key(&node.number);
    if !key.is_empty() {
        return Some(key);
    }
    if !node.identifier.is_empty() {
        return Some(node.identifier.clone());
    }
    return None;
}

/// Find the title a link parameter names: identifier, then file, then number.
pub fn find_title_by_location_param<'a>(catalog: &'a Catalog, value: &str) -> Option<&'a TitleMeta> {
    if value.is_empty() {
        return None;
    }
    let titles = &catalog.titles;
    if let Some(found) = titles.iter().find(|t| return t.identifier == value) {
        return Some(found);
    }
    if let Some(found) = titles.iter().find(|t| return t.file == value) {
        return Some(found);
    }
    let key = section_key(value);
    return titles.iter().find(|t| return section_key(&t.number) == key);
}

/// Put title and section parameters on `base`, replacing any already there.
pub fn build_link(base: &Url, title: &str, section: Option<&str>) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| return !matches!(k.as_ref(), "t" | "title" | "s" | "section"))
        .map(|(k, v)| return (k.into_owned(), v.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    {
        let mut pairs = link.query_pairs_mut();
        pairs.extend_pairs(kept);
        pairs.append_pair("t", title);
        if let Some(section) = section.filter(|s| return !s.is_empty()) {
            pairs.append_pair("s", section);
        }
    }
    return link;
}

/// Read the title and section a link points at. Short (`t`, `s`) and long
/// (`title`, `section`) parameter names are both accepted; short wins.
///
/// # Errors
///
/// Returns `Error::InvalidLink` if the text is not a URL or query string.
pub fn parse_link(raw: &str) -> Result<LinkState, Error> {
    let invalid = |e: url::ParseError| {
        return Error::InvalidLink { link: raw.to_string(), reason: e.to_string() };
    };
    let base = Url::parse(RELATIVE_BASE).map_err(invalid)?;
    let url = Url::options().base_url(Some(&base)).parse(raw.trim()).map_err(invalid)?;

    let param = |names: [&str; 2]| {
        return names.iter().find_map(|name| {
            return url
                .query_pairs()
                .find(|(k, v)| return k == name && !v.is_empty())
                .map(|(_, v)| return v.into_owned());
        });
    };

    return Ok(LinkState {
        section: param(["s", "section"]),
        title: param(["t", "title"]),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructureKind;

    fn meta(file: &str, identifier: &str, number: &str) -> TitleMeta {
        return TitleMeta {
            file: file.to_string(),
            heading: String::new(),
            identifier: identifier.to_string(),
            label: String::new(),
            number: number.to_string(),
            pointer: false,
        };
    }

    #[test]
    fn title_values() {
        assert_eq!(title_location_value(&meta("usc/usc50A.xml", "", "50 A")).unwrap(), "50A");
        assert_eq!(title_location_value(&meta("usc/usc01.xml", "/us/usc/t1", "")).unwrap(), "/us/usc/t1");
        assert!(title_location_value(&meta("", "", "")).is_none());
    }

    #[test]
    fn section_values() {
        let node = StructuralNode {
            children: Vec::new(),
            heading: String::new(),
            identifier: "/us/usc/t5/s101".to_string(),
            kind: StructureKind::Section,
            number: "§ 101.".to_string(),
        };
        assert_eq!(section_location_value(&node).unwrap(), "101");
    }

    #[test]
    fn finds_titles_by_any_param() {
        let catalog = Catalog {
            generated: String::new(),
            titles: vec![meta("usc/usc05.xml", "/us/usc/t5", "5"), meta("usc/usc11.xml", "/us/usc/t11", "11")],
        };
        assert_eq!(find_title_by_location_param(&catalog, "/us/usc/t11").unwrap().number, "11");
        assert_eq!(find_title_by_location_param(&catalog, "usc/usc05.xml").unwrap().number, "5");
        assert_eq!(find_title_by_location_param(&catalog, "11").unwrap().number, "11");
        assert!(find_title_by_location_param(&catalog, "").is_none());
        assert!(find_title_by_location_param(&catalog, "12").is_none());
    }

    #[test]
    fn link_round_trip() {
        let base = Url::parse("https://example.org/code/?t=1&theme=dark").unwrap();
        let link = build_link(&base, "5", Some("101"));
        assert_eq!(link.as_str(), "https://example.org/code/?theme=dark&t=5&s=101");

        let state = parse_link(link.as_str()).unwrap();
        assert_eq!(state.title.as_deref(), Some("5"));
        assert_eq!(state.section.as_deref(), Some("101"));
    }

    #[test]
    fn long_names_and_bare_queries() {
        let state = parse_link("?title=11&section=%C2%A7%20362").unwrap();
        assert_eq!(state.title.as_deref(), Some("11"));
        assert_eq!(state.section.as_deref(), Some("§ 362"));

        let state = parse_link("?s=1").unwrap();
        assert_eq!(state, LinkState { section: Some("1".to_string()), title: None });
    }

    #[test]
    fn unparseable_link_is_an_error() {
        assert!(matches!(parse_link("http://[::1"), Err(Error::InvalidLink { .. })));
    }
}
