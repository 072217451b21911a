//! Detects whether a directory lies inside a git working tree.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use tracing::debug;

use super::platform::PlatformKind;
use super::quoting::{unix_quote, windows_cmd_quote};
use super::runner::CommandRunner;

/// `spec.md` §6.2's stated default for git-repo probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Caches the git-repo status of each absolute directory ever queried.
/// Write-once-per-key, monotonic for the life of the process.
#[derive(Default)]
pub struct GitRepoProbe {
    cache: RwLock<HashMap<String, bool>>,
}

impl GitRepoProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `directory` (already validated as an absolute, existing path)
    /// is inside a git working tree. Any non-completed or non-zero-exit
    /// result from `git rev-parse --git-dir` is treated as "not a repo".
    pub fn is_git_repo(
        &self,
        directory: &Path,
        platform: PlatformKind,
        runner: &dyn CommandRunner,
        probe_timeout: Duration,
    ) -> bool {
        let key = directory.to_string_lossy().into_owned();

        if let Some(cached) = self.cache.read().expect("git repo cache poisoned").get(&key) {
            return *cached;
        }

        let command = build_probe_command(directory, platform);
        let outcome = runner.run(&command, probe_timeout);
        let is_repo = outcome.is_completed() && outcome.exit_code == 0;

        debug!(directory = %key, is_repo, "git repo probe");
        self.cache.write().expect("git repo cache poisoned").insert(key, is_repo);
        is_repo
    }
}

fn build_probe_command(directory: &Path, platform: PlatformKind) -> String {
    let dir = directory.to_string_lossy();
    match platform {
        PlatformKind::Windows => {
            format!("cd /d {} && git rev-parse --git-dir", windows_cmd_quote(&dir))
        }
        PlatformKind::Unix => {
            format!("cd {} && git rev-parse --git-dir", unix_quote(&dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::runner::{CommandOutcome, RunnerStatus};
    use std::process::Command;
    use tempfile::tempdir;

    struct ScriptedRunner(CommandOutcome);

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _command: &str, _timeout: Duration) -> CommandOutcome {
            self.0.clone()
        }
    }

    fn completed(exit_code: i32) -> CommandOutcome {
        CommandOutcome {
            status: RunnerStatus::Completed,
            exit_code,
            output: String::new(),
            error: String::new(),
            duration: None,
        }
    }

    #[test]
    fn caches_result_per_directory() {
        let probe = GitRepoProbe::new();
        let runner = ScriptedRunner(completed(0));
        let dir = tempdir().unwrap();

        assert!(probe.is_git_repo(dir.path(), PlatformKind::Unix, &runner, DEFAULT_PROBE_TIMEOUT));
        // Cached entries never flip even if asked again.
        assert!(probe.is_git_repo(dir.path(), PlatformKind::Unix, &runner, DEFAULT_PROBE_TIMEOUT));
    }

    #[test]
    fn nonzero_exit_means_not_a_repo() {
        let probe = GitRepoProbe::new();
        let runner = ScriptedRunner(completed(128));
        let dir = tempdir().unwrap();

        assert!(!probe.is_git_repo(dir.path(), PlatformKind::Unix, &runner, DEFAULT_PROBE_TIMEOUT));
    }

    #[test]
    fn detects_a_real_git_repo() {
        let available = Command::new("git").arg("--version").output().map(|o| o.status.success()).unwrap_or(false);
        if !available {
            return;
        }

        let dir = tempdir().unwrap();
        let run = |args: &[&str]| {
            let status = Command::new("git").args(args).current_dir(dir.path()).status().expect("git should spawn");
            assert!(status.success());
        };
        run(&["init", "-q"]);

        let probe = GitRepoProbe::new();
        let runner = crate::search::runner::SystemCommandRunner;
        let platform = if cfg!(windows) { PlatformKind::Windows } else { PlatformKind::Unix };
        assert!(probe.is_git_repo(dir.path(), platform, &runner, DEFAULT_PROBE_TIMEOUT));
    }
}
