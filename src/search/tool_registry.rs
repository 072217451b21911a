//! Tagged tool identifiers and table-driven priority/availability rules.
//!
//! Replaces what would otherwise be a dynamic subclass hierarchy of
//! searchers (`spec.md` §9) with a closed enum and pure functions keyed on
//! it, so the whole rule set is auditable in one file.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tracing::debug;

use super::platform::PlatformKind;
use super::runner::CommandRunner;

/// `spec.md` §6.2's stated default for availability probes. Callers that
/// load a [`crate::config::SearchConfig`] may pass a different value.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// One of the external search utilities the dispatcher knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    Fd,
    Rg,
    Find,
    Dir,
    PowerShellGci,
    Grep,
    GitGrep,
    SelectString,
}

impl ToolId {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fd => "fd",
            Self::Rg => "rg",
            Self::Find => "find",
            Self::Dir => "dir",
            Self::PowerShellGci => "powershell-gci",
            Self::Grep => "grep",
            Self::GitGrep => "git-grep",
            Self::SelectString => "select-string",
        }
    }
}

/// Which of the two services is asking for a priority list — relevant only
/// because the two services rank tools differently, not because the tools
/// themselves differ per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Files,
    Text,
}

/// Ordered candidate-tool list for a given platform and search kind.
/// `spec.md` §4.2. Pure function of its inputs — no I/O, no caching needed.
#[must_use]
pub fn priority(platform: PlatformKind, kind: SearchKind) -> Vec<ToolId> {
    match (platform, kind) {
        (PlatformKind::Unix, SearchKind::Text) => vec![ToolId::Rg, ToolId::GitGrep, ToolId::Grep],
        (PlatformKind::Unix, SearchKind::Files) => vec![ToolId::Fd, ToolId::Rg, ToolId::Find],
        (PlatformKind::Windows, SearchKind::Text) => {
            vec![ToolId::Rg, ToolId::GitGrep, ToolId::SelectString]
        }
        (PlatformKind::Windows, SearchKind::Files) => {
            vec![ToolId::Fd, ToolId::Rg, ToolId::PowerShellGci, ToolId::Dir]
        }
    }
}

/// Caches `is_available` results per tool for the life of the process.
/// Entries are monotonic: a probed result never changes once recorded.
#[derive(Default)]
pub struct ToolRegistry {
    availability: RwLock<HashMap<ToolId, bool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `spec.md` §4.2's ordered candidate list, filtered so that `GitGrep`
    /// only appears when the caller has already confirmed the target
    /// directory is a git repository.
    #[must_use]
    pub fn priority_for(
        &self,
        platform: PlatformKind,
        kind: SearchKind,
        directory_is_git_repo: bool,
    ) -> Vec<ToolId> {
        priority(platform, kind)
            .into_iter()
            .filter(|tool| *tool != ToolId::GitGrep || directory_is_git_repo)
            .collect()
    }

    /// Whether `tool` is usable on this host. Checked on first use and
    /// cached indefinitely; probe failures (timeout, non-zero exit,
    /// spawn error) are all folded into `false` and never propagate.
    pub fn is_available(
        &self,
        tool: ToolId,
        platform: PlatformKind,
        runner: &dyn CommandRunner,
        probe_timeout: Duration,
    ) -> bool {
        if let Some(cached) = self.availability.read().expect("tool cache poisoned").get(&tool) {
            return *cached;
        }

        let available = probe_availability(tool, platform, runner, probe_timeout);
        debug!(tool = tool.label(), available, "tool availability probe");
        self.availability.write().expect("tool cache poisoned").insert(tool, available);
        available
    }
}

fn probe_availability(
    tool: ToolId,
    platform: PlatformKind,
    runner: &dyn CommandRunner,
    probe_timeout: Duration,
) -> bool {
    // `Dir` is the Windows shell builtin; always present, never probed.
    if tool == ToolId::Dir {
        return true;
    }

    let command = match (tool, platform) {
        (ToolId::SelectString, _) => "powershell -Command \"Get-Command Select-String\"".to_string(),
        (ToolId::GitGrep, PlatformKind::Windows) => "git --version".to_string(),
        (ToolId::GitGrep, PlatformKind::Unix) => "command -v git".to_string(),
        (_, PlatformKind::Windows) => format!("where {}", tool.label()),
        (_, PlatformKind::Unix) => format!("command -v {}", tool.label()),
    };

    let outcome = runner.run(&command, probe_timeout);
    outcome.is_completed() && outcome.exit_code == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_text_priority_is_rg_gitgrep_grep() {
        assert_eq!(
            priority(PlatformKind::Unix, SearchKind::Text),
            vec![ToolId::Rg, ToolId::GitGrep, ToolId::Grep]
        );
    }

    #[test]
    fn unix_file_priority_is_fd_rg_find() {
        assert_eq!(
            priority(PlatformKind::Unix, SearchKind::Files),
            vec![ToolId::Fd, ToolId::Rg, ToolId::Find]
        );
    }

    #[test]
    fn windows_text_priority_is_rg_gitgrep_selectstring() {
        assert_eq!(
            priority(PlatformKind::Windows, SearchKind::Text),
            vec![ToolId::Rg, ToolId::GitGrep, ToolId::SelectString]
        );
    }

    #[test]
    fn windows_file_priority_is_fd_rg_gci_dir() {
        assert_eq!(
            priority(PlatformKind::Windows, SearchKind::Files),
            vec![ToolId::Fd, ToolId::Rg, ToolId::PowerShellGci, ToolId::Dir]
        );
    }

    #[test]
    fn gitgrep_excluded_when_not_a_repo() {
        let registry = ToolRegistry::new();
        let filtered = registry.priority_for(PlatformKind::Unix, SearchKind::Text, false);
        assert!(!filtered.contains(&ToolId::GitGrep));
        assert_eq!(filtered, vec![ToolId::Rg, ToolId::Grep]);
    }

    #[test]
    fn gitgrep_included_when_a_repo() {
        let registry = ToolRegistry::new();
        let included = registry.priority_for(PlatformKind::Unix, SearchKind::Text, true);
        assert!(included.contains(&ToolId::GitGrep));
    }

    #[test]
    fn dir_is_always_available() {
        use crate::search::runner::{CommandOutcome, RunnerStatus};
        struct NeverCalled;
        impl CommandRunner for NeverCalled {
            fn run(&self, _command: &str, _timeout: std::time::Duration) -> CommandOutcome {
                panic!("Dir should never be probed");
            }
        }
        let _ = RunnerStatus::Completed; // keep import used across cfgs
        let registry = ToolRegistry::new();
        assert!(registry.is_available(ToolId::Dir, PlatformKind::Windows, &NeverCalled, DEFAULT_PROBE_TIMEOUT));
    }
}
