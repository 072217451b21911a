//! Host family detection, computed once per process.

use std::fmt;
use std::sync::OnceLock;

/// Either side of the POSIX-shell / cmd-and-PowerShell divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Unix,
    Windows,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Detects the host family once per process and hands back the cached value
/// on every subsequent call. Deterministic for the life of the process.
#[derive(Debug, Default)]
pub struct PlatformProbe {
    kind: OnceLock<PlatformKind>,
}

impl PlatformProbe {
    #[must_use]
    pub const fn new() -> Self {
        Self { kind: OnceLock::new() }
    }

    /// The detected host family, computing it on first call.
    pub fn kind(&self) -> PlatformKind {
        *self.kind.get_or_init(detect_platform)
    }

    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.kind() == PlatformKind::Windows
    }
}

fn detect_platform() -> PlatformKind {
    if cfg!(target_os = "windows") { PlatformKind::Windows } else { PlatformKind::Unix }
}
