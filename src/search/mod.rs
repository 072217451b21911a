//! Cross-platform file and text search: dispatches to the best external
//! search tool available on the host and normalizes its output into a
//! single formatted string per call.
//!
//! The two services ([`file_search::FileSearchService`] and
//! [`text_search::TextSearchService`]) share the platform/tool-availability
//! machinery in this module but apply different fallback policies on tool
//! failure — see `text_search` and `file_search` for the rationale.

mod classify;
pub mod error;
pub mod file_search;
pub mod git_probe;
pub mod platform;
pub mod quoting;
pub mod runner;
pub mod text_search;
pub mod tool_registry;
pub mod validate;

pub use error::SearchError;
pub use file_search::{FileSearchService, PathType};
pub use platform::{PlatformKind, PlatformProbe};
pub use runner::{CommandOutcome, CommandRunner, RunnerStatus, SystemCommandRunner};
pub use text_search::{TextSearchService, DEFAULT_TEXT_MAX_RESULTS};
