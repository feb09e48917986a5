#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Run-wide constants, bundled so each stage receives them explicitly.

use std::time::Duration;

use crate::paths::ProjectPaths;

/// Default budget for a single jest run, in seconds.
const DEFAULT_JEST_TIMEOUT_SECS: u64 = 120;

/// Default time the student server is given to boot, in seconds.
const DEFAULT_SERVER_BOOT_SECS: u64 = 5;

/// Grace period after signalling the student server, in seconds.
const DEFAULT_SERVER_GRACE_SECS: u64 = 2;

/// Number of commits shown by the git log banner.
pub const NUM_COMMITS: usize = 10;

/// Everything a run needs that is not lab-specific.
#[derive(Debug, Clone)]
pub struct Settings {
    /// File locations for the project under test.
    paths:        ProjectPaths,
    /// Budget for each jest invocation.
    jest_timeout: Duration,
    /// Fixed delay between starting the student server and running jest.
    server_boot:  Duration,
    /// Time the student server is given to exit after SIGINT.
    server_grace: Duration,
    /// Commits shown by the git log banner.
    num_commits:  usize,
    /// Whether generated files are removed at the end of the run.
    cleanup:      bool,
}

impl Settings {
    /// Settings for `paths`, with timeouts read from the environment.
    pub fn new(paths: ProjectPaths) -> Self {
        Self {
            paths,
            jest_timeout: read_timeout_secs(
                "AUTOMARK_JEST_TIMEOUT_SECS",
                DEFAULT_JEST_TIMEOUT_SECS,
            ),
            server_boot: read_timeout_secs(
                "AUTOMARK_SERVER_BOOT_SECS",
                DEFAULT_SERVER_BOOT_SECS,
            ),
            server_grace: Duration::from_secs(DEFAULT_SERVER_GRACE_SECS),
            num_commits: NUM_COMMITS,
            cleanup: false,
        }
    }

    /// Returns the project paths.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Returns the jest timeout.
    pub fn jest_timeout(&self) -> Duration {
        self.jest_timeout
    }

    /// Returns the server boot delay.
    pub fn server_boot(&self) -> Duration {
        self.server_boot
    }

    /// Returns the server shutdown grace period.
    pub fn server_grace(&self) -> Duration {
        self.server_grace
    }

    /// Returns how many commits the git log banner shows.
    pub fn num_commits(&self) -> usize {
        self.num_commits
    }

    /// Returns whether generated files are cleaned up after the run.
    pub fn cleanup(&self) -> bool {
        self.cleanup
    }

    /// Returns a copy of these settings with a different jest budget.
    pub fn with_jest_timeout(mut self, jest_timeout: Duration) -> Self {
        self.jest_timeout = jest_timeout;
        self
    }

    /// Returns a copy of these settings with a different server boot delay.
    pub fn with_server_boot(mut self, server_boot: Duration) -> Self {
        self.server_boot = server_boot;
        self
    }

    /// Returns a copy of these settings with a different shutdown grace period.
    pub fn with_server_grace(mut self, server_grace: Duration) -> Self {
        self.server_grace = server_grace;
        self
    }

    /// Returns a copy of these settings with cleanup switched on or off.
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(ProjectPaths::default())
    }
}

/// Parses an environment variable into a `Duration`, falling back to
/// `default_secs` when parsing fails or the variable is missing.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    std::env::var(env)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}
