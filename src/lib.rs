//! Cross-platform file and text search: dispatches to the best external
//! search tool available on the host (`fd`, `rg`, `find`, `grep`, `git grep`,
//! PowerShell) and normalizes its output into a single formatted string.
//!
//! The two entry points are [`search::FileSearchService::search_files`] and
//! [`search::TextSearchService::search_text`]. Both are synchronous and
//! blocking — they shell out to a single external process per call and wait
//! for it, with no internal parallelism.

pub mod config;
pub mod logging;
pub mod search;

pub use config::SearchConfig;
pub use search::{
    FileSearchService, PathType, SearchError, SystemCommandRunner, TextSearchService,
    DEFAULT_TEXT_MAX_RESULTS,
};
