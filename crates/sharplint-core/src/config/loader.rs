//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::sharplint_config::SharplintConfig;
use crate::error::SharplintError;
use crate::result::Result;

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] =
    &[".sharplintrc.json", ".sharplintrc.toml", "sharplint.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Searches each directory for [`CONFIG_FILE_NAMES`] in order until a
    /// config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SharplintError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load config from an explicit path or auto-discover one
    ///
    /// An explicit path must exist. Without one, the search starts at
    /// `start_dir` (or the current directory); when nothing is found the
    /// default configuration is used.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<SharplintConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(SharplintError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return SharplintConfig::load(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => SharplintConfig::load(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(SharplintConfig::default())
            }
        }
    }
}
