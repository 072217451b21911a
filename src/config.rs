//! Configuration loading and defaults for `codesearch`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Raw `[search]` table as loaded from a TOML config file. Every field is
/// optional; unset fields fall back to the hard defaults in
/// [`SearchConfig::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
struct SearchConfigToml {
    search_timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    search: Option<SearchConfigToml>,
}

/// Resolved timeouts the dispatcher uses for search and availability/git
/// probes, with defaults applied.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub search_timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Loads `[search]` from `path` if it exists, merging over hard
    /// defaults. A missing file is not an error — it simply means
    /// "use the defaults".
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let parsed: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        Ok(Self::resolve(parsed.search.unwrap_or_default()))
    }

    fn resolve(raw: SearchConfigToml) -> Self {
        let defaults = Self::default();
        Self {
            search_timeout_secs: raw.search_timeout_secs.unwrap_or(defaults.search_timeout_secs),
            probe_timeout_secs: raw.probe_timeout_secs.unwrap_or(defaults.probe_timeout_secs),
        }
    }
}

/// Default config file location: `./codesearch.toml` in the current
/// directory, mirroring where a project-local override would be checked in.
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from("codesearch.toml")
}
