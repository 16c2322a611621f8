//! Keyword search across every title in the catalog.

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::normalize::{clean_whitespace, section_key};
use crate::parser::direct_child_text;
use crate::session::Session;
use crate::snippet::{Snippet, first_match};
use crate::types::{TitleMeta, USLM_NS};
use crate::xml::Document;

/// One section containing the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// Section heading.
    pub heading: String,
    /// Section identifier, possibly empty.
    pub identifier: String,
    /// Section number as authored, possibly empty.
    pub number: String,
    /// Character offset of the first occurrence of the query in `text`.
    pub offset: usize,
    /// Whitespace-collapsed text of the whole section.
    pub text: String,
    /// Title the section belongs to; shared by all matches from that title.
    pub title: Rc<TitleMeta>,
}

impl SearchMatch {
    /// The text to display around the match.
    pub fn snippet(&self, query: &str, radius: usize) -> Snippet {
        return Snippet::around(&self.text, self.offset, query.trim(), radius);
    }

    /// Token that reopens this section through the citation resolver.
    pub fn target(&self) -> &str {
        if self.identifier.is_empty() {
            return &self.number;
        }
        return &self.identifier;
    }
}

/// Everything a search produced. All three lists are always present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    /// Titles whose document failed to load or parse.
    pub failed: Vec<TitleMeta>,
    /// Matches in catalog order, then document order.
    pub matches: Vec<SearchMatch>,
    /// Titles flagged as unavailable placeholders.
    pub skipped: Vec<TitleMeta>,
}

/// Scan every title for sections whose text contains `query`, ignoring case.
///
/// Titles are loaded one at a time through the session cache. A title that
/// cannot be loaded is recorded in `failed` and the scan moves on.
///
/// # Errors
///
/// Returns `Error::EmptyQuery` if the query is blank; nothing is scanned.
pub fn search(session: &mut Session, catalog: &Catalog, query: &str) -> Result<SearchOutcome, Error> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let mut outcome = SearchOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for metadata in &catalog.titles {
        if metadata.pointer {
            outcome.skipped.push(metadata.clone());
            continue;
        }
        let doc = match load_searchable(session, metadata) {
            Err(e) => {
                tracing::warn!(file = %metadata.file, error = %e, "title skipped in search");
                outcome.failed.push(metadata.clone());
                continue;
            },
            Ok(doc) => doc,
        };
        let title = Rc::new(metadata.clone());
        scan_sections(&doc, &title, query, &mut seen, &mut outcome.matches);
    }

    tracing::info!(
        query,
        matches = outcome.matches.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.len(),
        "search finished"
    );
    return Ok(outcome);
}

/// Load a title and make sure it has a structural tree before scanning it.
///
/// # Errors
///
/// Returns any document or navigation error.
fn load_searchable(session: &mut Session, metadata: &TitleMeta) -> Result<Rc<Document>, Error> {
    session.navigation(metadata)?;
    return session.document(metadata);
}

/// Record the first match of each section in `doc`, skipping sections already seen.
fn scan_sections(
    doc: &Document,
    title: &Rc<TitleMeta>,
    query: &str,
    seen: &mut HashSet<String>,
    matches: &mut Vec<SearchMatch>,
) {
    for section in doc.root.descendants().filter(|e| return e.is(USLM_NS, "section")) {
        let text = clean_whitespace(&section.text_content());
        if text.is_empty() {
            continue;
        }
        let Some(offset) = first_match(&text, query) else {
            continue;
        };

        let identifier = section.attribute("identifier").unwrap_or_default().to_string();
        let number = direct_child_text(section, "num");
        let local_key = if identifier.is_empty() { section_key(&number) } else { identifier.clone() };
        if !seen.insert(format!("{}::{local_key}", title.file)) {
            continue;
        }

        matches.push(SearchMatch {
            heading: direct_child_text(section, "heading"),
            identifier,
            number,
            offset,
            text,
            title: Rc::clone(title),
        });
    }
}
