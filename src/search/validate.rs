//! Input validation shared by both services (`spec.md` §4.3, §7).
//!
//! Each validator returns the exact sub-message the original Python
//! implementation produced, since downstream tooling and tests match on
//! these strings rather than on the tagged variant alone.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::error::SearchError;

/// Confirms `directory` exists, is a directory, and is readable, returning
/// its canonicalized absolute form (`spec.md` §4.4: `validate_directory(path)
/// → absolute path`). Callers must thread this returned path — not the raw
/// input — into anything that caches by directory (the git-repo probe) or
/// embeds the directory into a built command, so that two spellings of the
/// same directory (`"."` vs its absolute form) share one cache entry.
pub fn validate_directory(directory: &Path) -> Result<PathBuf, SearchError> {
    let metadata = match fs::metadata(directory) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SearchError::invalid_directory(format!(
                "Directory does not exist: {}",
                directory.display()
            )));
        }
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SearchError::invalid_directory(format!(
                "Permission denied: Cannot read directory: {}",
                directory.display()
            )));
        }
        Err(err) => {
            return Err(SearchError::invalid_directory(format!(
                "Cannot read directory: {}: {err}",
                directory.display()
            )));
        }
    };

    if !metadata.is_dir() {
        return Err(SearchError::invalid_directory(format!(
            "Not a directory: {}",
            directory.display()
        )));
    }

    if fs::read_dir(directory).is_err() {
        return Err(SearchError::invalid_directory(format!(
            "Permission denied: Cannot read directory: {}",
            directory.display()
        )));
    }

    Ok(fs::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf()))
}

/// Confirms a glob/name pattern is non-empty once trimmed.
pub fn validate_glob(pattern: &str) -> Result<(), SearchError> {
    if pattern.trim().is_empty() {
        return Err(SearchError::invalid_pattern("Pattern cannot be empty"));
    }
    Ok(())
}

/// Confirms a regex pattern is non-empty and compiles.
pub fn validate_regex(pattern: &str) -> Result<(), SearchError> {
    if pattern.trim().is_empty() {
        return Err(SearchError::invalid_pattern("Pattern cannot be empty"));
    }
    Regex::new(pattern)
        .map_err(|err| SearchError::invalid_pattern(format!("Invalid regex pattern: {err}")))?;
    Ok(())
}

/// Confirms `max_results`, when present, is non-negative.
pub fn validate_max_results(max_results: Option<i64>) -> Result<(), SearchError> {
    if let Some(value) = max_results {
        if value < 0 {
            return Err(SearchError::invalid_argument("max_results must be non-negative"));
        }
    }
    Ok(())
}
