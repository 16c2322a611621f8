//! Title catalog: loading the JSON listing and rebuilding it from the XML files.

use std::fs::File;
use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::Error;
use crate::normalize::clean_whitespace;
use crate::source::LFS_SIGNATURE;
use crate::types::{TitleMeta, USLM_NS};

/// Dublin Core namespace, used by `<dc:title>` in the document metadata.
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Elements that may carry a title document's top-level heading.
const ROOT_TAGS: &[&str] = &["appendix", "division", "subtitle", "title"];

/// The catalog document. Title order is the order every listing and search follows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// RFC 3339 time the catalog was generated.
    #[serde(default)]
    pub generated: String,
    /// Titles in catalog order.
    pub titles: Vec<TitleMeta>,
}

impl Catalog {
    /// Read a catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the catalog doesn't exist,
    /// `Error::Io` for other read failures, or `Error::Json` if it is malformed.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Ok(serde_json::from_str(&content)?);
    }

    /// Write the catalog as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be written or `Error::Json` if serialization fails.
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        return Ok(());
    }

    /// Scan `root/source_dir` for `usc*.xml` files, sorted by name, and read each title's metadata.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a file cannot be read, `Error::XmlMalformed` if one is not XML,
    /// or `Error::MetadataIncomplete` if a title lacks its number, label, or heading.
    pub fn build(root: &Path, source_dir: &Path) -> Result<Self, Error> {
        let mut files: Vec<PathBuf> = WalkDir::new(root.join(source_dir))
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| return e.file_type().is_file() && is_title_file(e.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();

        let mut titles = Vec::with_capacity(files.len());
        for path in &files {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let location = relative.to_string_lossy().replace('\\', "/");
            titles.push(extract_title_metadata(path, location)?);
        }

        return Ok(Self {
            generated: chrono::Utc::now().to_rfc3339(),
            titles,
        });
    }
}

/// `usc<anything>.xml`
fn is_title_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| return n.to_str()) else {
        return false;
    };
    return name.starts_with("usc") && name.ends_with(".xml");
}

/// Catalog entry for a title whose XML has not been fetched from large-file storage.
fn pointer_metadata(path: &Path, location: String) -> TitleMeta {
    let stem = path.file_stem().and_then(|s| return s.to_str()).unwrap_or_default();
    let number = stem.strip_prefix("usc").unwrap_or(stem).to_string();
    let label = if number.is_empty() { stem.to_string() } else { format!("Title {number}") };
    return TitleMeta {
        file: location,
        heading: format!("{label} (data stored via Git LFS; fetch required)"),
        identifier: String::new(),
        label: String::new(),
        number,
        pointer: true,
    };
}

/// Whether a file's first line is a Git LFS pointer header.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read.
fn is_lfs_pointer(path: &Path) -> Result<bool, Error> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    return Ok(first_line.trim().starts_with(LFS_SIGNATURE));
}

/// Metadata fields collected while streaming one title file.
#[derive(Default)]
struct TitleScan {
    /// Document or root identifier.
    identifier: String,
    /// Heading of the top-level structural element.
    long_heading: String,
    /// `<docNumber>` text.
    number: String,
    /// `<dc:title>` text.
    short_heading: String,
    /// Inside the top-level structural element.
    watching_root: bool,
}

impl TitleScan {
    /// All three texts found; reading can stop.
    fn is_complete(&self) -> bool {
        return !self.short_heading.is_empty() && !self.number.is_empty() && !self.long_heading.is_empty();
    }
}

/// Stream a title's XML for its catalog metadata, stopping once everything is found.
///
/// # Errors
///
/// Returns `Error::XmlMalformed` if the reader fails before the metadata is complete,
/// or `Error::MetadataIncomplete` if the document ends first.
fn extract_title_metadata(path: &Path, location: String) -> Result<TitleMeta, Error> {
    if is_lfs_pointer(path)? {
        return Ok(pointer_metadata(path, location));
    }

    let mut reader = NsReader::from_reader(BufReader::new(File::open(path)?));
    let mut buf = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    let mut scan = TitleScan::default();

    loop {
        buf.clear();
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| return Error::malformed(&location, e))?;
        let in_uslm = matches!(ns, ResolveResult::Bound(uri) if uri.0 == USLM_NS.as_bytes());
        let in_dc = matches!(ns, ResolveResult::Bound(uri) if uri.0 == DC_NS.as_bytes());

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().into_inner()).into_owned();
                let identifier = match start
                    .try_get_attribute("identifier")
                    .map_err(|e| return Error::malformed(&location, e))?
                {
                    None => String::new(),
                    Some(attr) => attr
                        .unescape_value()
                        .map_err(|e| return Error::malformed(&location, e))?
                        .into_owned(),
                };
                if in_uslm && name == "uscDoc" && scan.identifier.is_empty() {
                    scan.identifier = identifier;
                } else if in_uslm && ROOT_TAGS.contains(&name.as_str()) && scan.long_heading.is_empty() {
                    scan.watching_root = true;
                    if identifier.starts_with("/us/usc/") && scan.identifier.is_empty() {
                        scan.identifier = identifier;
                    }
                }
                texts.push(String::new());
            },
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.local_name().into_inner()).into_owned();
                let raw = texts.pop().unwrap_or_default();
                if let Some(parent) = texts.last_mut() {
                    parent.push_str(&raw);
                }
                let text = clean_whitespace(&raw);
                if in_dc && name == "title" && scan.short_heading.is_empty() {
                    scan.short_heading = text;
                } else if in_uslm && name == "docNumber" && scan.number.is_empty() {
                    scan.number = text;
                } else if scan.watching_root && in_uslm && name == "heading" && scan.long_heading.is_empty() {
                    scan.long_heading = text;
                } else if scan.watching_root && in_uslm && ROOT_TAGS.contains(&name.as_str()) {
                    scan.watching_root = false;
                }
            },
            Event::Text(raw) => {
                let content = raw.unescape().map_err(|e| return Error::malformed(&location, e))?;
                if let Some(current) = texts.last_mut() {
                    current.push_str(&content);
                }
            },
            Event::Eof => break,
            Event::CData(_) | Event::Comment(_) | Event::Decl(_) | Event::DocType(_) | Event::Empty(_)
            | Event::PI(_) => {},
        }
        if scan.is_complete() {
            break;
        }
    }

    if !scan.is_complete() {
        return Err(Error::MetadataIncomplete { file: path.to_path_buf() });
    }
    tracing::debug!(file = %location, number = %scan.number, "read title metadata");

    let heading = scan.long_heading;
    return Ok(TitleMeta {
        file: location,
        heading,
        identifier: scan.identifier,
        label: scan.short_heading,
        number: scan.number,
        pointer: false,
    });
}
