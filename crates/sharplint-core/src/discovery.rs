//! Source file discovery
//!
//! Directories are walked recursively; a file is selected when its path
//! relative to the walked directory matches an include pattern and no
//! exclude pattern. Files named explicitly are only checked against the
//! exclude patterns.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::SharplintConfig;
use crate::error::SharplintError;
use crate::result::Result;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                SharplintError::config_error(format!("Invalid glob pattern '{p}': {e}"))
            })
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// Collect the source files to lint under `paths`
///
/// The result is sorted and free of duplicates. A path that does not exist
/// is an error.
pub fn discover_files(paths: &[PathBuf], config: &SharplintConfig) -> Result<Vec<PathBuf>> {
    let include = compile_patterns(&config.include_patterns())?;
    let exclude = compile_patterns(&config.exclude_patterns())?;
    let mut files = BTreeSet::new();

    for root in paths {
        if root.is_file() {
            if !matches_any(&exclude, root) {
                files.insert(root.clone());
            }
            continue;
        }
        if !root.is_dir() {
            return Err(SharplintError::io_error(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            ));
        }

        debug!("Discovering files in {}", root.display());
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_hidden_dir(entry))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if matches_any(&include, relative) && !matches_any(&exclude, relative) {
                files.insert(path.to_path_buf());
            }
        }
    }

    info!("Discovered {} source files", files.len());
    Ok(files.into_iter().collect())
}
