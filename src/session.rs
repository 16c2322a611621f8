//! Session-scoped caches shared by citation lookups and keyword search.

use std::collections::HashMap;
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::index::NavigationIndex;
use crate::parser::parse_structure;
use crate::search::{self, SearchOutcome};
use crate::source::{DocumentSource, is_placeholder};
use crate::types::{StructuralNode, TitleMeta};
use crate::xml::Document;

/// The structural tree and index of one title.
#[derive(Debug)]
pub struct Navigation {
    /// Key to ancestor path.
    pub index: NavigationIndex,
    /// Root of the structural tree.
    pub root: Rc<StructuralNode>,
}

/// Proof that a search was issued, ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(
    /// Generation number; higher was issued later.
    u64,
);

/// "Last issued wins" bookkeeping for searches.
///
/// Every search takes a ticket before it starts; results are published
/// only if no newer ticket has been issued in the meantime.
#[derive(Debug, Default)]
pub struct SearchGenerations {
    /// Most recently issued generation.
    latest: u64,
    /// Results of the newest search that has been published.
    published: Option<(u64, SearchOutcome)>,
}

impl SearchGenerations {
    /// Issue a ticket for a new search. Any older ticket stops being current.
    pub fn begin(&mut self) -> SearchTicket {
        self.latest = self.latest.saturating_add(1);
        return SearchTicket(self.latest);
    }

    /// Store a search's results unless a newer search has been issued since.
    /// Returns whether the results were accepted.
    pub fn publish(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "dropping stale search results");
            return false;
        }
        self.published = Some((ticket.0, outcome));
        return true;
    }

    /// Results of the last accepted search.
    pub fn latest(&self) -> Option<&SearchOutcome> {
        return self.published.as_ref().map(|(_, outcome)| return outcome);
    }
}

/// Parsed documents and navigation, keyed by catalog file location.
///
/// Entries are added only after a successful parse, so a document that
/// failed is fetched again on the next request. Nothing is mutated once
/// cached.
pub struct Session {
    /// Parsed documents.
    documents: HashMap<String, Rc<Document>>,
    /// Maximum element nesting accepted by the XML reader.
    max_depth: usize,
    /// Built navigation per document.
    navigation: HashMap<String, Rc<Navigation>>,
    /// Search tickets and the published results.
    searches: SearchGenerations,
    /// Backing store for document text.
    source: Box<dyn DocumentSource>,
}

impl Session {
    /// Start an empty session reading from `source`.
    pub fn new(source: Box<dyn DocumentSource>, max_depth: usize) -> Self {
        return Self {
            documents: HashMap::new(),
            max_depth,
            navigation: HashMap::new(),
            searches: SearchGenerations::default(),
            source,
        };
    }

    /// Fetch and parse a title's XML, or return the cached parse.
    ///
    /// # Errors
    ///
    /// Returns `Error::LfsPlaceholder` if the text is a pointer file, plus any
    /// fetch or XML reader error. Failures are not cached.
    pub fn document(&mut self, metadata: &TitleMeta) -> Result<Rc<Document>, Error> {
        if let Some(doc) = self.documents.get(&metadata.file) {
            tracing::debug!(file = %metadata.file, "document cache hit");
            return Ok(Rc::clone(doc));
        }

        let text = self.source.fetch(&metadata.file)?;
        if is_placeholder(&text) {
            return Err(Error::LfsPlaceholder { file: metadata.file.clone() });
        }
        let doc = Rc::new(Document::parse(&metadata.file, &text, self.max_depth)?);
        tracing::info!(file = %metadata.file, bytes = text.len(), "loaded document");

        self.documents.insert(metadata.file.clone(), Rc::clone(&doc));
        return Ok(doc);
    }

    /// Build (or reuse) the structural tree and index for a title.
    ///
    /// # Errors
    ///
    /// Returns document loading errors and `Error::NoStructuralRoot`.
    pub fn navigation(&mut self, metadata: &TitleMeta) -> Result<Rc<Navigation>, Error> {
        if let Some(nav) = self.navigation.get(&metadata.file) {
            return Ok(Rc::clone(nav));
        }

        let doc = self.document(metadata)?;
        let root = Rc::new(parse_structure(&metadata.file, &doc)?);
        let index = NavigationIndex::build(&root);
        tracing::debug!(
            file = %metadata.file,
            nodes = root.node_count(),
            keys = index.len(),
            "built navigation index"
        );

        let nav = Rc::new(Navigation { index, root });
        self.navigation.insert(metadata.file.clone(), Rc::clone(&nav));
        return Ok(nav);
    }

    /// Issue a ticket for a new search.
    pub fn begin_search(&mut self) -> SearchTicket {
        return self.searches.begin();
    }

    /// Publish results for `ticket`; stale tickets are refused.
    pub fn publish_search(&mut self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        return self.searches.publish(ticket, outcome);
    }

    /// Results of the last accepted search.
    pub fn latest_search(&self) -> Option<&SearchOutcome> {
        return self.searches.latest();
    }

    /// Keyword search over every catalog title, through this session's caches.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyQuery` for a blank query.
    pub fn search(&mut self, catalog: &Catalog, query: &str) -> Result<SearchOutcome, Error> {
        return search::search(self, catalog, query);
    }
}
