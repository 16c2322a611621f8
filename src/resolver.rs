use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::index::NavigationIndex;
use crate::normalize::section_key;
use crate::parser::direct_child_text;
use crate::types::{AncestorPath, TitleMeta, USLM_NS};
use crate::xml::{Document, Element};

/// Stable identifiers are absolute USLM paths such as `/us/usc/t5/s101`.
#[allow(clippy::expect_used, reason = "literal pattern, checked by tests")]
static IDENTIFIER_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^/us/\S+$").expect("valid identifier regex");
});

/// Whether a token should be looked up as a stable identifier rather than a number.
pub fn is_identifier(token: &str) -> bool {
    return IDENTIFIER_SHAPE.is_match(token);
}

/// Resolve a citation token inside one title.
///
/// Identifier-shaped tokens are looked up verbatim; everything else by
/// `section_key`. `None` means "section not found", an ordinary outcome.
pub fn resolve<'a>(index: &'a NavigationIndex, token: &str) -> Option<&'a AncestorPath> {
    let token = token.trim();
    if is_identifier(token) {
        return index.get(token);
    }
    let key = section_key(token);
    if key.is_empty() {
        return None;
    }
    return index.get(&key);
}

/// Validate a user-entered title token and return its lookup key.
///
/// # Errors
///
/// Returns `Error::InvalidTitleToken` if the token is empty or has no letters or digits.
pub fn title_key(raw: &str) -> Result<String, Error> {
    let key = section_key(raw.trim());
    if key.is_empty() {
        return Err(Error::InvalidTitleToken { token: raw.to_string() });
    }
    return Ok(key);
}

/// Find the catalog entry whose declared number matches a title key.
///
/// `Title 11`, `title11`, and `TITLE 11` share one key; a leading `title`
/// word is dropped when the full key matches nothing.
pub fn resolve_title<'a>(catalog: &'a Catalog, key: &str) -> Option<&'a TitleMeta> {
    let exact = catalog.titles.iter().find(|t| return section_key(&t.number) == key);
    if exact.is_some() {
        return exact;
    }
    let bare = key.strip_prefix("title").filter(|rest| return !rest.is_empty())?;
    return catalog.titles.iter().find(|t| return section_key(&t.number) == bare);
}

/// Locate a section's markup for rendering: identifier match first, then
/// the first section whose `num` normalizes to the same key.
pub fn find_section_element<'a>(
    document: &'a Document,
    identifier: &str,
    number: &str,
) -> Option<&'a Element> {
    let mut sections = document.root.descendants().filter(|e| return e.is(USLM_NS, "section"));

    if !identifier.is_empty()
        && let Some(found) = sections.clone().find(|s| return s.attribute("identifier") == Some(identifier))
    {
        return Some(found);
    }
    if number.is_empty() {
        return None;
    }
    let target = section_key(number);
    return sections.find(|s| return section_key(&direct_child_text(s, "num")) == target);
}
