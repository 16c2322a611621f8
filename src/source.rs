//! Where document text comes from.

use std::path::PathBuf;

use crate::error::Error;

/// First line of a Git LFS pointer file.
pub const LFS_SIGNATURE: &str = "version https://git-lfs.github.com";

/// Supplies the raw text of a catalog file location.
pub trait DocumentSource {
    /// Fetch the full text stored at `file`.
    ///
    /// # Errors
    ///
    /// Implementations return `Error::FileNotFound` for missing documents and
    /// other variants for transport failures.
    fn fetch(&self, file: &str) -> Result<String, Error>;
}

/// Documents on the local filesystem, relative to a library root.
pub struct FsSource {
    /// Directory the catalog's file locations are relative to.
    root: PathBuf,
}

impl FsSource {
    /// Read documents relative to `root`.
    pub const fn new(root: PathBuf) -> Self {
        return Self { root };
    }
}

impl DocumentSource for FsSource {
    fn fetch(&self, file: &str) -> Result<String, Error> {
        let path = self.root.join(file);
        return match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound { path }),
            Err(e) => Err(Error::Io(e)),
            Ok(text) => Ok(text),
        };
    }
}

/// Whether fetched text is a large-file-storage pointer rather than the document.
pub fn is_placeholder(text: &str) -> bool {
    return text.starts_with(LFS_SIGNATURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("usc")).unwrap();
        std::fs::write(dir.path().join("usc/usc01.xml"), "<title/>").unwrap();
        let source = FsSource::new(dir.path().to_path_buf());
        assert_eq!(source.fetch("usc/usc01.xml").unwrap(), "<title/>");
        assert!(matches!(source.fetch("usc/usc02.xml"), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn detects_lfs_pointer() {
        assert!(is_placeholder("version https://git-lfs.github.com/spec/v1\noid sha256:00"));
        assert!(!is_placeholder("<?xml version=\"1.0\"?>"));
    }
}
