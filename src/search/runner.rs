//! The `CommandRunner` collaborator boundary (`spec.md` §6.2).
//!
//! The dispatcher never spawns processes itself — it hands a fully built
//! shell string to a `CommandRunner` and classifies the `CommandOutcome` it
//! gets back. Production code uses `SystemCommandRunner`; tests substitute a
//! scripted fake so the dispatch/fallback logic can be exercised without
//! depending on which search tools happen to be installed on the CI host.
//!
//! `SystemCommandRunner`'s timeout enforcement follows the same
//! spawn-then-`wait_timeout`-then-kill shape the teacher application uses in
//! its own shell-execution tool, including draining stdout/stderr on reader
//! threads started before the wait — a tool that fills the OS pipe buffer
//! (~64KB on Linux) before anyone reads it would otherwise block on its own
//! `write()` forever, and `wait_timeout` would misreport that as a timeout.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

/// Coarse outcome of an attempted command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStatus {
    Completed,
    Running,
    Timeout,
    Error,
}

/// Result record handed back by a `CommandRunner`, matching the
/// `{status, exit_code, output, error, duration_seconds}` shape `spec.md`
/// §6.2 specifies for the external collaborator.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub status: RunnerStatus,
    pub exit_code: i32,
    pub output: String,
    pub error: String,
    pub duration: Option<Duration>,
}

impl CommandOutcome {
    #[must_use]
    pub fn completed(exit_code: i32, output: String, error: String, duration: Duration) -> Self {
        Self { status: RunnerStatus::Completed, exit_code, output, error, duration: Some(duration) }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == RunnerStatus::Completed
    }
}

/// Executes a single shell-ready command string with a timeout. The internal
/// policy of a real implementation (whitelisting, rate limiting, resource
/// caps) is out of scope for this subsystem; it consumes whatever
/// implementation the host application wires in.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str, timeout: Duration) -> CommandOutcome;
}

/// Default `CommandRunner` backed by the host's own shell
/// (`sh -c` on Unix, `cmd /C` on Windows).
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &str, timeout: Duration) -> CommandOutcome {
        let mut cmd = shell_command(command);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());

        let start = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                return CommandOutcome {
                    status: RunnerStatus::Error,
                    exit_code: -1,
                    output: String::new(),
                    error: err.to_string(),
                    duration: Some(start.elapsed()),
                };
            }
        };

        // Start draining stdout/stderr before waiting so a chatty tool never
        // blocks on a full pipe while wait_timeout is polling.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        match child.wait_timeout(timeout) {
            Ok(Some(status)) => CommandOutcome::completed(
                status.code().unwrap_or(-1),
                join_reader(stdout_reader),
                join_reader(stderr_reader),
                start.elapsed(),
            ),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                // Drain whatever the killed process had already written so
                // a near-timeout tool's partial output isn't silently lost,
                // even though this path still reports Timeout.
                let _ = join_reader(stdout_reader);
                let _ = join_reader(stderr_reader);
                CommandOutcome {
                    status: RunnerStatus::Timeout,
                    exit_code: -1,
                    output: String::new(),
                    error: format!("command timed out after {timeout:?}"),
                    duration: Some(start.elapsed()),
                }
            }
            Err(err) => {
                let _ = join_reader(stdout_reader);
                let _ = join_reader(stderr_reader);
                CommandOutcome {
                    status: RunnerStatus::Error,
                    exit_code: -1,
                    output: String::new(),
                    error: err.to_string(),
                    duration: Some(start.elapsed()),
                }
            }
        }
    }
}

/// Spawns a background thread that reads a child's pipe to completion,
/// avoiding the classic "process blocks on write() while we block on wait()"
/// deadlock for output larger than the OS pipe buffer.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|handle| handle.join().ok()).unwrap_or_default()
}

#[cfg(target_os = "windows")]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_a_trivial_command() {
        let runner = SystemCommandRunner;
        let outcome = runner.run("echo hello", Duration::from_secs(5));
        assert!(outcome.is_completed());
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.output.trim(), "hello");
    }

    #[test]
    fn nonzero_exit_is_still_completed() {
        let runner = SystemCommandRunner;
        let outcome = runner.run("exit 1", Duration::from_secs(5));
        assert!(outcome.is_completed());
        assert_eq!(outcome.exit_code, 1);
    }

    #[test]
    #[cfg(not(target_os = "windows"))]
    fn timeout_is_classified_distinctly() {
        let runner = SystemCommandRunner;
        let outcome = runner.run("sleep 5", Duration::from_millis(100));
        assert_eq!(outcome.status, RunnerStatus::Timeout);
    }

    /// A tool emitting more than one OS pipe buffer's worth of output (64KB
    /// on Linux) before exiting must not be misclassified as a timeout —
    /// regression test for the pipe-drain deadlock.
    #[test]
    #[cfg(not(target_os = "windows"))]
    fn large_output_does_not_spuriously_time_out() {
        let runner = SystemCommandRunner;
        let outcome = runner.run(
            "yes x | head -c 2000000",
            Duration::from_secs(10),
        );
        assert!(outcome.is_completed());
        assert_eq!(outcome.output.len(), 2_000_000);
    }
}
