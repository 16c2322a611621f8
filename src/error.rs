/// Crate-level error types for uscnav diagnostics.
use std::path::PathBuf;

/// All errors in uscnav carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the document, query, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A keyword search was started with an empty or whitespace-only query.
    #[error("empty search query")]
    EmptyQuery,

    /// A referenced document or catalog file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// `.uscnav.toml` parsed but holds a value outside its accepted range.
    #[error("invalid config `{key}`: {reason}")]
    InvalidConfig {
        /// Offending key.
        key: String,
        /// What is wrong with its value.
        reason: String,
    },

    /// A deep link could not be parsed as a URL.
    #[error("invalid link `{link}`: {reason}")]
    InvalidLink {
        /// The raw link text.
        link: String,
        /// Parser message.
        reason: String,
    },

    /// Title token given on the command line normalizes to nothing.
    #[error("invalid title number: `{token}`")]
    InvalidTitleToken {
        /// The raw token as the user typed it.
        token: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Catalog JSON could not be read or written.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// Document text is a large-file-storage pointer, not XML.
    #[error("content not available (Git LFS placeholder): {file}")]
    LfsPlaceholder {
        /// Catalog file location of the placeholder.
        file: String,
    },

    /// The catalog builder could not find the number, label, and heading of a title.
    #[error("unable to extract metadata from {}", file.display())]
    MetadataIncomplete {
        /// XML file that lacked metadata.
        file: PathBuf,
    },

    /// No structural element exists anywhere in the document.
    #[error("unable to locate structural root in {file}")]
    NoStructuralRoot {
        /// Catalog file location of the document.
        file: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Element nesting exceeded the configured maximum depth.
    #[error("document nests deeper than {max_depth} elements: {file}")]
    TooDeep {
        /// Catalog file location of the document.
        file: String,
        /// Configured maximum depth.
        max_depth: usize,
    },

    /// The XML reader rejected the document.
    #[error("malformed XML in {file}: {reason}")]
    XmlMalformed {
        /// Catalog file location of the document.
        file: String,
        /// Reader message.
        reason: String,
    },
}

impl Error {
    /// Build an `XmlMalformed` from any displayable reader error.
    pub fn malformed(file: &str, reason: impl std::fmt::Display) -> Self {
        return Self::XmlMalformed {
            file: file.to_string(),
            reason: reason.to_string(),
        };
    }
}
