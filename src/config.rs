use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::xml::MAX_DEPTH_LIMIT;

/// Name of the project config file, looked up in the library root.
pub const CONFIG_FILE: &str = ".uscnav.toml";

/// Library configuration loaded from `.uscnav.toml`.
/// Paths are relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog JSON file.
    pub catalog: PathBuf,
    /// Maximum element nesting accepted when parsing a title.
    pub max_depth: usize,
    /// Characters of context shown on each side of a search match.
    pub snippet_radius: usize,
    /// Directory holding the `usc*.xml` title files.
    pub source_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            catalog: PathBuf::from("data/titles.json"),
            max_depth: 512,
            snippet_radius: 160,
            source_dir: PathBuf::from("usc"),
        };
    }
}

impl Config {
    /// Load config from `.uscnav.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// A config file that exists but is malformed is an error, never a
    /// silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, or `Error::InvalidConfig`
    /// if `max_depth` is zero or above `MAX_DEPTH_LIMIT`.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        let config: Self = toml::from_str(&content)?;
        if config.max_depth == 0 || config.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::InvalidConfig {
                key: "max_depth".to_string(),
                reason: format!("must be between 1 and {MAX_DEPTH_LIMIT}, got {}", config.max_depth),
            });
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        return Ok(config);
    }
}
