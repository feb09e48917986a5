#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use itertools::Itertools;

/// Errors that abort an automarking run.
///
/// Missing result files are not errors; parsers recover from those with a
/// zero-valued record.
#[derive(thiserror::Error, Debug)]
pub enum AutomarkError {
    /// The weights leave nothing (or less than nothing) for the staff tests.
    #[error("ERROR: Test factor should not be negative! (got {test_factor})")]
    NegativeTestFactor {
        /// `1 - (coverage_factor + lint_factor)` after rounding
        test_factor: f64,
    },
    /// The effective weights add up to more than 1.
    #[error(
        "ERROR: Sum of scale factors cannot be greater than 1! [{test_factor}, \
         {coverage_factor}, {lint_factor}]"
    )]
    OverallocatedWeights {
        /// Weight of the staff tests
        test_factor:     f64,
        /// Weight of coverage
        coverage_factor: f64,
        /// Weight of lint
        lint_factor:     f64,
    },
    /// Zero or several `automarking.test.[jt]s` files were found.
    #[error("Did not find exactly 1 test file: [{}]", .found.iter().map(|p| p.display()).join(", "))]
    AutomarkingFileDiscovery {
        /// Every file the glob matched
        found: Vec<PathBuf>,
    },
    /// The optional working directory argument could not be entered.
    #[error("Could not change into directory {}", .0.display())]
    WorkingDirectory(PathBuf),
}
