//! `search_text` — the TextSearch service (`spec.md` §2, §4.6, §4.8, §4.9).

use std::path::Path;
use std::time::Duration;

use tracing::warn;

use super::classify::{classify, failure_cause, Classification};
use super::error::SearchError;
use super::git_probe::GitRepoProbe;
use super::platform::{PlatformKind, PlatformProbe};
use super::quoting::{powershell_quote, unix_quote, windows_cmd_quote};
use super::runner::CommandRunner;
use super::tool_registry::{priority, SearchKind, ToolId, ToolRegistry, DEFAULT_PROBE_TIMEOUT};
use super::validate::{validate_directory, validate_max_results, validate_regex};
use crate::config::SearchConfig;

pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The original Python `GrepTextService`'s default cap on match count
/// (`GrepTextService.DEFAULT_MAX_RESULTS = 100` in `original_source`) when
/// the caller passes no `max_results` at all. `spec.md` §4.4's literal
/// contract treats an absent `max_results` as "no local cap", so
/// `TextSearchService::search_text` does not apply this automatically — a
/// CLI or host layer that wants the original's out-of-the-box truncation
/// can pass `Some(DEFAULT_TEXT_MAX_RESULTS)` explicitly.
pub const DEFAULT_TEXT_MAX_RESULTS: i64 = 100;

/// A single `file:line:content` record parsed out of raw tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Match {
    file: String,
    line_number: u64,
    content: String,
}

/// Process-wide singleton collaborators for text search.
pub struct TextSearchService {
    platform: PlatformProbe,
    tools: ToolRegistry,
    git: GitRepoProbe,
    search_timeout: Duration,
    probe_timeout: Duration,
}

impl Default for TextSearchService {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSearchService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: PlatformProbe::new(),
            tools: ToolRegistry::new(),
            git: GitRepoProbe::new(),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            platform: PlatformProbe::new(),
            tools: ToolRegistry::new(),
            git: GitRepoProbe::new(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    /// Locates lines matching a regular expression inside files under
    /// `directory`. Unlike file search, the first available candidate tool
    /// is given a single attempt; a hard failure raises immediately rather
    /// than falling back to the next tool (`spec.md` §4.9's rationale).
    pub fn search_text(
        &self,
        pattern: &str,
        directory: &Path,
        case_sensitive: bool,
        max_results: Option<i64>,
        runner: &dyn CommandRunner,
    ) -> Result<String, SearchError> {
        validate_regex(pattern)?;
        let directory = validate_directory(directory)?;
        validate_max_results(max_results)?;

        let platform = self.platform.kind();
        let is_repo = self.git.is_git_repo(&directory, platform, runner, self.probe_timeout);

        let mut candidates = priority(platform, SearchKind::Text);
        if !is_repo {
            candidates.retain(|tool| *tool != ToolId::GitGrep);
        }

        for tool in candidates {
            if !self.tools.is_available(tool, platform, runner, self.probe_timeout) {
                continue;
            }

            let command = build_command(tool, pattern, &directory, case_sensitive, platform);
            let outcome = runner.run(&command, self.search_timeout);

            return match classify(&outcome) {
                Classification::Success => {
                    let matches = parse_matches(&outcome.output, platform, max_results);
                    Ok(render_text_results(&matches))
                }
                Classification::NoMatches => Ok(render_text_results(&[])),
                Classification::Failure => {
                    let cause = failure_cause(&outcome);
                    warn!(tool = tool.label(), command = %command, cause = %cause, "text search tool failed");
                    Err(SearchError::SearchFailed {
                        message: format!("{} exited with a failure status", tool.label()),
                        command,
                        cause: Some(cause),
                    })
                }
                Classification::RunnerError => {
                    Err(SearchError::ExecutionError { message: failure_cause(&outcome) })
                }
            };
        }

        Err(SearchError::NoToolAvailable)
    }
}

fn build_command(
    tool: ToolId,
    pattern: &str,
    directory: &Path,
    case_sensitive: bool,
    platform: PlatformKind,
) -> String {
    let dir = directory.to_string_lossy();
    match tool {
        ToolId::Grep => {
            let flag = if case_sensitive { "" } else { " -i" };
            format!("grep -rnH -E{flag} {} {}", unix_quote(pattern), unix_quote(&dir))
        }
        ToolId::Rg => {
            let quote: fn(&str) -> String =
                if platform == PlatformKind::Windows { windows_cmd_quote } else { unix_quote };
            let flag = if case_sensitive { "" } else { " -i" };
            format!(
                "rg -n --no-heading --with-filename --hidden{flag} -e {} {}",
                quote(pattern),
                quote(&dir)
            )
        }
        ToolId::GitGrep => {
            let flag = if case_sensitive { "" } else { " -i" };
            match platform {
                PlatformKind::Windows => format!(
                    "cd /d {} && git grep -n --full-name -E{flag} {}",
                    windows_cmd_quote(&dir),
                    windows_cmd_quote(pattern)
                ),
                PlatformKind::Unix => format!(
                    "cd {} && git grep -n --full-name -E{flag} {}",
                    unix_quote(&dir),
                    unix_quote(pattern)
                ),
            }
        }
        ToolId::SelectString => build_select_string_command(pattern, &dir, case_sensitive),
        other => unreachable!("{other:?} is not part of the text-search priority list"),
    }
}

fn build_select_string_command(pattern: &str, directory: &str, case_sensitive: bool) -> String {
    let mut select = format!("Select-String -Pattern {}", powershell_quote(pattern));
    if case_sensitive {
        select.push_str(" -CaseSensitive");
    }
    let script = format!(
        "Get-ChildItem -Path {} -Recurse -File -Force | {select} | ForEach-Object {{ \"$($_.Path):$($_.LineNumber):$($_.Line)\" }}",
        powershell_quote(directory)
    );
    format!("powershell -NoProfile -Command {}", windows_cmd_quote(&script))
}

fn parse_matches(raw: &str, platform: PlatformKind, max_results: Option<i64>) -> Vec<Match> {
    let cap = max_results.map(|n| usize::try_from(n.max(0)).unwrap_or(usize::MAX));
    let mut matches = Vec::new();

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.splitn(3, ':').collect();
        if parts.len() != 3 {
            continue;
        }
        let Ok(line_number) = parts[1].parse::<u64>() else {
            continue;
        };

        matches.push(Match {
            file: normalize_separator(parts[0], platform),
            line_number,
            content: parts[2].to_string(),
        });

        if let Some(cap) = cap {
            if matches.len() >= cap {
                break;
            }
        }
    }

    matches.sort_by(|a, b| a.file.cmp(&b.file).then(a.line_number.cmp(&b.line_number)));
    matches
}

fn normalize_separator(file: &str, platform: PlatformKind) -> String {
    match platform {
        PlatformKind::Unix => file.replace('\\', "/"),
        PlatformKind::Windows => file.replace('/', "\\"),
    }
}

fn render_text_results(matches: &[Match]) -> String {
    if matches.is_empty() {
        return "Found 0 matches.".to_string();
    }

    let mut lines = vec![format!("Found {} match(es).", matches.len())];
    let mut current_file: Option<&str> = None;
    for m in matches {
        if current_file != Some(m.file.as_str()) {
            lines.push(format!("**{}:**", m.file));
            current_file = Some(m.file.as_str());
        }
        lines.push(format!("- {}: {}", m.line_number, m.content));
    }
    lines.join("\n")
}
