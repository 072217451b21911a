//! `search_files` — the FileSearch service (`spec.md` §2, §4.5, §4.7, §4.9).

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use super::classify::{classify, failure_cause, Classification};
use super::error::SearchError;
use super::platform::{PlatformKind, PlatformProbe};
use super::quoting::{powershell_quote, unix_quote, windows_cmd_quote};
use super::runner::CommandRunner;
use super::tool_registry::{priority, SearchKind, ToolId, ToolRegistry, DEFAULT_PROBE_TIMEOUT};
use super::validate::{validate_directory, validate_glob, validate_max_results};
use crate::config::SearchConfig;

/// Default per-invocation timeout for an actual search (`spec.md` §6.2).
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether reported paths are left absolute or relativized to the request
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    Absolute,
    Relative,
}

/// Process-wide singleton collaborators for file search. Construct once and
/// share; the caches inside `ToolRegistry` are only useful if reused across
/// calls.
pub struct FileSearchService {
    platform: PlatformProbe,
    tools: ToolRegistry,
    search_timeout: Duration,
    probe_timeout: Duration,
}

impl Default for FileSearchService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSearchService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: PlatformProbe::new(),
            tools: ToolRegistry::new(),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            platform: PlatformProbe::new(),
            tools: ToolRegistry::new(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    /// Locates files by glob/name pattern under `directory`, dispatching to
    /// the best available external tool and falling back to the next
    /// candidate on tool failure.
    pub fn search_files(
        &self,
        pattern: &str,
        directory: &Path,
        max_results: Option<i64>,
        path_type: PathType,
        runner: &dyn CommandRunner,
    ) -> Result<String, SearchError> {
        validate_glob(pattern)?;
        let directory = validate_directory(directory)?;
        validate_max_results(max_results)?;

        let platform = self.platform.kind();
        let candidates = priority(platform, SearchKind::Files);

        let mut last_cause: Option<String> = None;
        for tool in candidates {
            if !self.tools.is_available(tool, platform, runner, self.probe_timeout) {
                continue;
            }

            let command = build_command(tool, pattern, &directory, max_results, platform);
            let outcome = runner.run(&command, self.search_timeout);

            match classify(&outcome) {
                Classification::Success => {
                    let hits = normalize_file_hits(
                        &outcome.output,
                        &directory,
                        path_type,
                        max_results,
                        platform,
                    );
                    return Ok(render_file_results(&hits));
                }
                Classification::NoMatches => return Ok(render_file_results(&[])),
                Classification::Failure => {
                    let cause = failure_cause(&outcome);
                    warn!(tool = tool.label(), cause = %cause, "file search tool failed, trying next candidate");
                    last_cause = Some(cause);
                }
                Classification::RunnerError => {
                    return Err(SearchError::ExecutionError { message: failure_cause(&outcome) });
                }
            }
        }

        Err(SearchError::AllSearchersFailed { cause: last_cause })
    }
}

fn build_command(
    tool: ToolId,
    pattern: &str,
    directory: &Path,
    max_results: Option<i64>,
    platform: PlatformKind,
) -> String {
    let dir = directory.to_string_lossy();
    match (tool, platform) {
        (ToolId::Fd, PlatformKind::Unix) => {
            let mut cmd = format!(
                "fd --type f --hidden --absolute-path {} {}",
                unix_quote(pattern),
                unix_quote(&dir)
            );
            if let Some(n) = max_results {
                cmd.push_str(&format!(" --max-results {n}"));
            }
            cmd
        }
        (ToolId::Fd, PlatformKind::Windows) => {
            let mut cmd = format!(
                "fd --type f --hidden --absolute-path {} {}",
                windows_cmd_quote(pattern),
                windows_cmd_quote(&dir)
            );
            if let Some(n) = max_results {
                cmd.push_str(&format!(" --max-results {n}"));
            }
            cmd
        }
        (ToolId::Rg, PlatformKind::Unix) => {
            format!("rg --files --hidden --glob={} {}", unix_quote(pattern), unix_quote(&dir))
        }
        (ToolId::Rg, PlatformKind::Windows) => {
            format!(
                "rg --files --hidden --glob={} {}",
                windows_cmd_quote(pattern),
                windows_cmd_quote(&dir)
            )
        }
        (ToolId::Find, _) => {
            format!("find {} -type f -name {}", unix_quote(&dir), unix_quote(pattern))
        }
        (ToolId::PowerShellGci, _) => build_powershell_gci_command(pattern, &dir, max_results),
        (ToolId::Dir, _) => build_dir_command(pattern, &dir),
        (other, _) => unreachable!("{other:?} is not part of the file-search priority list"),
    }
}

fn build_powershell_gci_command(pattern: &str, directory: &str, max_results: Option<i64>) -> String {
    let mut script = format!(
        "Get-ChildItem -Path {} -Recurse -File -Force -Filter {} | Select-Object -ExpandProperty FullName",
        powershell_quote(directory),
        powershell_quote(pattern)
    );
    if let Some(n) = max_results {
        script.push_str(&format!(" | Select-Object -First {n}"));
    }
    format!("powershell -NoProfile -Command {}", windows_cmd_quote(&script))
}

fn build_dir_command(pattern: &str, directory: &str) -> String {
    let trimmed = directory.trim_end_matches(['\\', '/']);
    let target = format!("{trimmed}\\{pattern}");
    format!("dir {} /s /b /a-d /a", windows_cmd_quote(&target))
}

fn normalize_file_hits(
    raw_output: &str,
    directory: &Path,
    path_type: PathType,
    max_results: Option<i64>,
    platform: PlatformKind,
) -> Vec<String> {
    let mut hits: Vec<String> = raw_output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let path = Path::new(line);
            let rendered: PathBuf = match path_type {
                PathType::Absolute => path.to_path_buf(),
                PathType::Relative => {
                    path.strip_prefix(directory).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
                }
            };
            host_path_string(&rendered, platform)
        })
        .collect();

    if let Some(n) = max_results {
        hits.truncate(usize::try_from(n.max(0)).unwrap_or(usize::MAX));
    }
    hits
}

fn host_path_string(path: &Path, platform: PlatformKind) -> String {
    let raw = path.to_string_lossy().into_owned();
    match platform {
        PlatformKind::Unix => raw.replace('\\', "/"),
        PlatformKind::Windows => raw.replace('/', "\\"),
    }
}

fn render_file_results(hits: &[String]) -> String {
    if hits.is_empty() {
        return "**Found 0 files**".to_string();
    }
    let label = if hits.len() == 1 { "file" } else { "files" };
    let mut rendered = format!("**Found {} {}:**\n\n", hits.len(), label);
    rendered.push_str(&hits.join("\n"));
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::runner::{CommandOutcome, RunnerStatus};
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct ScriptedRunner {
        outcomes: Mutex<Vec<CommandOutcome>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(outcomes: Vec<CommandOutcome>) -> Self {
            Self { outcomes: Mutex::new(outcomes), calls: Mutex::new(Vec::new()) }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &str, _timeout: Duration) -> CommandOutcome {
            self.calls.lock().unwrap().push(command.to_string());
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                CommandOutcome { status: RunnerStatus::Error, exit_code: -1, output: String::new(), error: "no more scripted outcomes".into(), duration: None }
            } else {
                outcomes.remove(0)
            }
        }
    }

    fn completed(exit_code: i32, output: &str) -> CommandOutcome {
        CommandOutcome { status: RunnerStatus::Completed, exit_code, output: output.to_string(), error: String::new(), duration: None }
    }

    #[test]
    fn empty_pattern_is_rejected_before_any_command_runs() {
        let service = FileSearchService::new();
        let dir = tempdir().unwrap();
        let runner = ScriptedRunner::new(vec![]);
        let err = service.search_files("  ", dir.path(), None, PathType::Absolute, &runner).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
    }

    #[test]
    fn renders_zero_files_found() {
        let hits: Vec<String> = vec![];
        assert_eq!(render_file_results(&hits), "**Found 0 files**");
    }

    #[test]
    fn renders_singular_header_for_one_file() {
        let hits = vec!["/tmp/proj/file1.py".to_string()];
        assert_eq!(render_file_results(&hits), "**Found 1 file:**\n\n/tmp/proj/file1.py");
    }

    #[test]
    fn renders_plural_header_for_many_files() {
        let hits = vec!["/a.py".to_string(), "/b.py".to_string()];
        assert_eq!(render_file_results(&hits), "**Found 2 files:**\n\n/a.py\n/b.py");
    }

    #[test]
    fn falls_back_to_next_candidate_when_first_tool_errors_hard() {
        let service = FileSearchService::new();
        let dir = tempdir().unwrap();
        // Every tool "available"; first (Fd) hard-fails, second (Rg) succeeds.
        let runner = AlwaysAvailableThenScripted::new(vec![
            completed(2, ""),
            completed(0, "/tmp/proj/a.py\n"),
        ]);
        let result = service.search_files("*.py", dir.path(), None, PathType::Absolute, &runner).unwrap();
        assert!(result.starts_with("**Found 1 file:**"));
    }

    #[test]
    fn raises_all_searchers_failed_when_every_candidate_hard_fails() {
        let service = FileSearchService::new();
        let dir = tempdir().unwrap();
        let runner = AlwaysAvailableThenScripted::new(vec![completed(2, ""), completed(2, ""), completed(2, "")]);
        let err = service.search_files("*.py", dir.path(), None, PathType::Absolute, &runner).unwrap_err();
        assert!(matches!(err, SearchError::AllSearchersFailed { .. }));
    }

    #[test]
    fn runner_error_raises_execution_error_without_trying_further_candidates() {
        let service = FileSearchService::new();
        let dir = tempdir().unwrap();
        let runner = AlwaysAvailableThenScripted::new(vec![CommandOutcome {
            status: RunnerStatus::Error,
            exit_code: -1,
            output: String::new(),
            error: "failed to spawn".into(),
            duration: None,
        }]);
        let err = service.search_files("*.py", dir.path(), None, PathType::Absolute, &runner).unwrap_err();
        assert!(matches!(err, SearchError::ExecutionError { .. }));
        // Only the first candidate's search command ran, not a second one.
        assert_eq!(runner.inner.calls.lock().unwrap().iter().filter(|c| !c.starts_with("command -v")).count(), 1);
    }

    /// A runner that reports every availability probe as available (exit 0)
    /// and then drains the scripted outcomes for the actual search attempts.
    struct AlwaysAvailableThenScripted {
        inner: ScriptedRunner,
    }

    impl AlwaysAvailableThenScripted {
        fn new(search_outcomes: Vec<CommandOutcome>) -> Self {
            Self { inner: ScriptedRunner::new(search_outcomes) }
        }
    }

    impl CommandRunner for AlwaysAvailableThenScripted {
        fn run(&self, command: &str, timeout: Duration) -> CommandOutcome {
            if command.starts_with("command -v") || command.starts_with("where ") {
                return completed(0, "");
            }
            self.inner.run(command, timeout)
        }
    }
}
