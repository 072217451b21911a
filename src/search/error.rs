//! Error taxonomy shared by the file-search and text-search services.

/// Tagged error kinds returned by `search_files`/`search_text`.
///
/// Every variant carries a human-readable message; a handful also carry a
/// `cause` with the diagnostic from the last tool attempted, mirroring the
/// `(message, optional cause)` shape `spec.md` §7 requires.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Empty/whitespace pattern, or (text search) a pattern that does not
    /// compile as a regex.
    #[error("{message}")]
    InvalidPattern { message: String },

    /// Missing, not-a-directory, unreadable, or empty directory path.
    #[error("{message}")]
    InvalidDirectory { message: String },

    /// Negative `max_results` or other constraint violation.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// No candidate tool is available on the host for the current request.
    #[error("no search tool available for this request")]
    NoToolAvailable,

    /// A tool completed with exit code > 1. Text search only. Carries the
    /// exact shell command that was run (`spec.md` §7: "carrying its stderr
    /// and the command") so a caller debugging a failure can see what was
    /// actually invoked, not just the tool's name.
    #[error("search command failed: {message} (command: {command})")]
    SearchFailed { message: String, command: String, cause: Option<String> },

    /// Every candidate tool was tried and each was unavailable or failed.
    /// File search only.
    #[error("all available file searchers failed to complete the search")]
    AllSearchersFailed { cause: Option<String> },

    /// The `CommandRunner` collaborator itself could not run the command at
    /// all (e.g. the process failed to spawn) — distinct from a search tool
    /// completing with a bad exit code or timing out.
    #[error("error executing command: {message}")]
    ExecutionError { message: String },
}

impl SearchError {
    pub(crate) fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern { message: message.into() }
    }

    pub(crate) fn invalid_directory(message: impl Into<String>) -> Self {
        Self::InvalidDirectory { message: message.into() }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

/// Short machine-stable tag for the variant, useful for logs/metrics without
/// embedding the full message.
impl SearchError {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::InvalidDirectory { .. } => "invalid_directory",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NoToolAvailable => "no_tool_available",
            Self::SearchFailed { .. } => "search_failed",
            Self::AllSearchersFailed { .. } => "all_searchers_failed",
            Self::ExecutionError { .. } => "execution_error",
        }
    }
}
