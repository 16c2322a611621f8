//! CLI commands for uscnav: titles, toc, show, search, link, open, catalog.

use std::io::IsTerminal as _;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use serde::Serialize;
use url::Url;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::diagnostics::{BOLD, RESET};
use crate::error::Error;
use crate::labels::{node_label, section_hit_label, title_display_label, title_full_label};
use crate::normalize::clean_whitespace;
use crate::permalink;
use crate::resolver;
use crate::search::SearchOutcome;
use crate::session::{Navigation, Session};
use crate::source::FsSource;
use crate::types::{StructuralNode, StructureKind, TitleMeta, USLM_NS};
use crate::xml::Element;

/// Base URL for `link` when none is given.
pub const DEFAULT_LINK_BASE: &str = "http://localhost:8000/";

/// Exit code for lookups that found nothing.
const NOT_FOUND: u8 = 1;

/// Everything a command needs from the library root.
struct Library {
    /// Title listing.
    catalog: Catalog,
    /// Loaded `.uscnav.toml`.
    config: Config,
    /// Document and navigation caches for this run.
    session: Session,
}

/// JSON shape of `search --json`.
#[derive(Serialize)]
struct SearchReport<'a> {
    /// Result buckets.
    #[serde(flatten)]
    outcome: &'a SearchOutcome,
    /// Trimmed query.
    query: &'a str,
}

/// Rebuild the catalog JSON from the title XML files.
///
/// # Errors
///
/// Returns config, scan, or write errors.
pub fn catalog(root: &Path) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let catalog = Catalog::build(root, &config.source_dir)?;
    let path = root.join(&config.catalog);
    catalog.write(&path)?;

    let pointers = catalog.titles.iter().filter(|t| return t.pointer).count();
    tracing::info!(path = %path.display(), titles = catalog.titles.len(), pointers, "wrote catalog");
    eprintln!("Wrote {} titles to {}", catalog.titles.len(), config.catalog.display());
    return Ok(ExitCode::SUCCESS);
}

/// Look up a title from a user token, printing the not-found message.
///
/// # Errors
///
/// Returns `Error::InvalidTitleToken` if the token has no letters or digits.
fn find_title(catalog: &Catalog, raw: &str) -> Result<Option<TitleMeta>, Error> {
    let key = resolver::title_key(raw)?;
    let found = resolver::resolve_title(catalog, &key).cloned();
    if found.is_none() {
        println!("Title {} not found.", raw.trim());
    }
    return Ok(found);
}

/// Print a deep link to a title or section.
///
/// # Errors
///
/// Returns library loading errors, `Error::InvalidLink` for a bad base, or
/// document errors when a section has to be resolved.
pub fn link(root: &Path, title: &str, section: Option<&str>, base: &str) -> Result<ExitCode, Error> {
    let base = Url::parse(base).map_err(|e| {
        return Error::InvalidLink { link: base.to_string(), reason: e.to_string() };
    })?;
    let mut library = open_library(root)?;
    let Some(meta) = find_title(&library.catalog, title)? else {
        return Ok(ExitCode::from(NOT_FOUND));
    };
    let Some(title_value) = permalink::title_location_value(&meta) else {
        println!("{} has no linkable location.", title_display_label(&meta));
        return Ok(ExitCode::from(NOT_FOUND));
    };

    let section_value = match section {
        None => None,
        Some(token) => {
            let Some(nav) = load_navigation(&mut library.session, &meta)? else {
                return Ok(ExitCode::from(NOT_FOUND));
            };
            let Some(target) = resolver::resolve(&nav.index, token).and_then(|path| return path.last()) else {
                println!("Section could not be located in this title.");
                return Ok(ExitCode::from(NOT_FOUND));
            };
            permalink::section_location_value(target)
        },
    };

    println!("{}", permalink::build_link(&base, &title_value, section_value.as_deref()));
    return Ok(ExitCode::SUCCESS);
}

/// Build navigation, turning placeholder titles into a printed notice.
///
/// # Errors
///
/// Returns any document or structure error other than a placeholder.
fn load_navigation(session: &mut Session, meta: &TitleMeta) -> Result<Option<Rc<Navigation>>, Error> {
    if meta.pointer {
        print_placeholder_notice(meta);
        return Ok(None);
    }
    return match session.navigation(meta) {
        Err(Error::LfsPlaceholder { .. }) => {
            print_placeholder_notice(meta);
            Ok(None)
        },
        Err(e) => Err(e),
        Ok(nav) => Ok(Some(nav)),
    };
}

/// Show the title and section a deep link points at.
///
/// # Errors
///
/// Returns `Error::InvalidLink` for text that is not a link, plus `show` errors.
pub fn open(root: &Path, raw: &str) -> Result<ExitCode, Error> {
    let state = permalink::parse_link(raw)?;
    let Some(title) = state.title else {
        println!("Link does not name a title.");
        return Ok(ExitCode::from(NOT_FOUND));
    };

    let mut library = open_library(root)?;
    let Some(meta) = permalink::find_title_by_location_param(&library.catalog, &title).cloned() else {
        println!("Title {title} not found.");
        return Ok(ExitCode::from(NOT_FOUND));
    };
    return show_title(&mut library, &meta, state.section.as_deref());
}

/// Load config, catalog, and a fresh session for `root`.
///
/// # Errors
///
/// Returns config errors, or `Error::FileNotFound` if the catalog is missing.
fn open_library(root: &Path) -> Result<Library, Error> {
    let config = Config::load(root)?;
    let catalog = Catalog::read(&root.join(&config.catalog))?;
    tracing::debug!(titles = catalog.titles.len(), generated = %catalog.generated, "read catalog");
    let session = Session::new(Box::new(FsSource::new(root.to_path_buf())), config.max_depth);
    return Ok(Library { catalog, config, session });
}

/// Tell the user a title has not been fetched from large-file storage.
fn print_placeholder_notice(meta: &TitleMeta) {
    println!(
        "This title uses Git LFS storage and the XML content is not available. Run `git lfs pull --include \"{}\"` to fetch it.",
        meta.file
    );
    return;
}

/// Paragraph text of a section element, one block per child, without the
/// number and heading.
fn section_body(element: &Element) -> Vec<String> {
    return element
        .elements()
        .filter(|child| return !child.is(USLM_NS, "num") && !child.is(USLM_NS, "heading"))
        .map(|child| return clean_whitespace(&child.text_content()))
        .filter(|text| return !text.is_empty())
        .collect();
}

/// Keyword search across every catalog title.
///
/// # Errors
///
/// Returns library loading errors, `Error::EmptyQuery`, or JSON errors.
pub fn search(root: &Path, query: &str, json: bool) -> Result<ExitCode, Error> {
    let mut library = open_library(root)?;
    let ticket = library.session.begin_search();
    let outcome = library.session.search(&library.catalog, query)?;
    library.session.publish_search(ticket, outcome);
    let Some(outcome) = library.session.latest_search() else {
        return Ok(ExitCode::from(NOT_FOUND));
    };

    let query = query.trim();
    if json {
        let report = SearchReport { outcome, query };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let (open, close) = if std::io::stdout().is_terminal() { (BOLD, RESET) } else { ("[", "]") };
        for found in &outcome.matches {
            println!("{} {}", title_display_label(&found.title), section_hit_label(&found.number, &found.heading));
            println!("  {}", found.snippet(query, library.config.snippet_radius).render(open, close));
            println!("  -> {}", found.target());
        }
        print_search_notes(outcome);
        if outcome.matches.is_empty() {
            println!("No matches for \"{query}\".");
        }
    }

    if outcome.matches.is_empty() {
        return Ok(ExitCode::from(NOT_FOUND));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Notes for titles a search could not cover.
fn print_search_notes(outcome: &SearchOutcome) {
    let names = |titles: &[TitleMeta]| {
        return titles.iter().map(title_display_label).collect::<Vec<_>>().join(", ");
    };
    if !outcome.skipped.is_empty() {
        println!("Skipped (content stored via Git LFS): {}", names(&outcome.skipped));
    }
    if !outcome.failed.is_empty() {
        println!("Unable to search: {}", names(&outcome.failed));
    }
    return;
}

/// Resolve a citation and print it, or the title overview when no section is given.
///
/// # Errors
///
/// Returns library loading errors, `Error::InvalidTitleToken`, or document errors.
pub fn show(root: &Path, title: &str, section: Option<&str>) -> Result<ExitCode, Error> {
    let mut library = open_library(root)?;
    let Some(meta) = find_title(&library.catalog, title)? else {
        return Ok(ExitCode::from(NOT_FOUND));
    };
    return show_title(&mut library, &meta, section);
}

/// Print a resolved node: breadcrumbs, then section text or the child list.
///
/// # Errors
///
/// Returns document errors.
fn show_node(library: &mut Library, meta: &TitleMeta, path: &[Rc<StructuralNode>]) -> Result<(), Error> {
    let Some(target) = path.last() else {
        return Ok(());
    };
    let crumbs: Vec<String> = path.iter().map(|node| return node_label(node)).collect();
    println!("{}", crumbs.join(" › "));
    println!();

    if target.kind != StructureKind::Section {
        for child in &target.children {
            println!("  {}", node_label(child));
        }
        return Ok(());
    }

    let doc = library.session.document(meta)?;
    let Some(element) = resolver::find_section_element(&doc, &target.identifier, &target.number) else {
        println!("Section text is not available.");
        return Ok(());
    };
    for paragraph in section_body(element) {
        println!("{paragraph}");
        println!();
    }
    return Ok(());
}

/// `show` for an already-resolved title.
///
/// # Errors
///
/// Returns document errors.
fn show_title(library: &mut Library, meta: &TitleMeta, section: Option<&str>) -> Result<ExitCode, Error> {
    let Some(nav) = load_navigation(&mut library.session, meta)? else {
        return Ok(ExitCode::from(NOT_FOUND));
    };

    let Some(token) = section.filter(|s| return !s.trim().is_empty()) else {
        println!("{}", title_full_label(meta));
        if !meta.identifier.is_empty() {
            println!("{}", meta.identifier);
        }
        println!();
        for child in &nav.root.children {
            println!("  {}", node_label(child));
        }
        return Ok(ExitCode::SUCCESS);
    };

    if nav.index.is_empty() {
        println!("This title has no addressable sections.");
        return Ok(ExitCode::from(NOT_FOUND));
    }
    let Some(path) = resolver::resolve(&nav.index, token) else {
        println!("Section could not be located in this title.");
        return Ok(ExitCode::from(NOT_FOUND));
    };
    show_node(library, meta, path)?;
    return Ok(ExitCode::SUCCESS);
}

/// List every title in catalog order.
///
/// # Errors
///
/// Returns library loading errors.
pub fn titles(root: &Path) -> Result<ExitCode, Error> {
    let library = open_library(root)?;
    for meta in &library.catalog.titles {
        let value = permalink::title_location_value(meta).unwrap_or_default();
        let marker = if meta.pointer { "  [not checked out]" } else { "" };
        println!("{value:<5} {}{marker}", title_full_label(meta));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the indented table of contents of a title.
///
/// # Errors
///
/// Returns library loading errors, `Error::InvalidTitleToken`, or document errors.
pub fn toc(root: &Path, title: &str) -> Result<ExitCode, Error> {
    let mut library = open_library(root)?;
    let Some(meta) = find_title(&library.catalog, title)? else {
        return Ok(ExitCode::from(NOT_FOUND));
    };
    let Some(nav) = load_navigation(&mut library.session, &meta)? else {
        return Ok(ExitCode::from(NOT_FOUND));
    };

    // Explicit stack: trees can be as deep as the configured maximum.
    let mut stack: Vec<(&StructuralNode, usize)> = vec![(nav.root.as_ref(), 0)];
    while let Some((node, depth)) = stack.pop() {
        println!("{}{}", "  ".repeat(depth), node_label(node));
        for child in node.children.iter().rev() {
            stack.push((child.as_ref(), depth.saturating_add(1)));
        }
    }
    return Ok(ExitCode::SUCCESS);
}
