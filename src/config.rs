//! Start-up configuration: where the library file and the log file live.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library-manager";
/// JSON file holding the catalog.
const LIBRARY_FILE_NAME: &str = "library.json";
/// Log file written next to the library file.
const LOG_FILE_NAME: &str = "library-manager.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub library_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Use `library_override` when given (command line flag or
    /// `LIBRARY_MANAGER_FILE`), otherwise the default file in the home
    /// directory.
    pub fn resolve(library_override: Option<PathBuf>) -> Result<Self> {
        let library_path = match library_override {
            Some(path) => path,
            None => default_library_path()?,
        };
        Ok(Self::for_library(library_path))
    }

    /// Derive the remaining paths from the library file location.
    pub fn for_library(library_path: impl Into<PathBuf>) -> Self {
        let library_path = library_path.into();
        let log_path = match library_path.parent() {
            Some(parent) => parent.join(LOG_FILE_NAME),
            None => PathBuf::from(LOG_FILE_NAME),
        };
        Self {
            library_path,
            log_path,
        }
    }

    /// Create the directory holding the library file. The store never creates
    /// directories on its own, so this runs once during start-up.
    pub fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.library_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create data directory {}", parent.display())
                })?;
            }
        }
        Ok(())
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }
}

/// Resolve the library file inside the user's home directory.
fn default_library_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(LIBRARY_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_keeps_log_next_to_library() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/shelf/books.json"))).unwrap();
        assert_eq!(config.library_path, PathBuf::from("/tmp/shelf/books.json"));
        assert_eq!(
            config.log_path,
            PathBuf::from("/tmp/shelf/library-manager.log")
        );
    }

    #[test]
    fn bare_file_name_logs_to_working_directory() {
        let config = Config::for_library("library.json");
        assert_eq!(config.log_path, PathBuf::from("library-manager.log"));
        config.ensure_dirs().unwrap();
    }

    #[test]
    fn ensure_dirs_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_library(dir.path().join("a").join("b").join("library.json"));
        config.ensure_dirs().unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
