#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default weighting of coverage in the final mark.
pub const DEFAULT_COVERAGE_FACTOR: f64 = 0.2;

/// Default weighting of lint in the final mark.
pub const DEFAULT_LINT_FACTOR: f64 = 0.1;

/// What a lab asks the automarker to assess.
///
/// Keys present in `automarking-config.json` override the defaults, keys
/// that are absent keep them, and unrecognised keys are ignored. Weights are
/// not validated here; see [`crate::grade::calculate_final_score`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkingConfig {
    /// Whether student tests are run to measure coverage.
    pub coverage:        bool,
    /// Whether eslint is run.
    pub lint:            bool,
    /// Whether the student server is started around each jest run.
    pub server:          bool,
    /// Weighting of coverage (0-1).
    pub coverage_factor: f64,
    /// Weighting of lint (0-1).
    pub lint_factor:     f64,
}

impl Default for MarkingConfig {
    fn default() -> Self {
        Self {
            coverage:        false,
            lint:            false,
            server:          false,
            coverage_factor: DEFAULT_COVERAGE_FACTOR,
            lint_factor:     DEFAULT_LINT_FACTOR,
        }
    }
}

/// Loads the marking config at `path`, falling back to
/// [`MarkingConfig::default`] when the file does not exist.
///
/// A file that exists but is not valid JSON is an error.
pub fn load_config(path: &Path) -> Result<MarkingConfig> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No {} found, using default config", path.display());
            return Ok(MarkingConfig::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not read {}", path.display()));
        }
    };

    serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse {} as a marking config", path.display()))
}
