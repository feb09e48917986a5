#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! All scores here are out of 1.

use serde::{Deserialize, Serialize};

use crate::{config::MarkingConfig, error::AutomarkError};

/// Decimal places kept in weights and the final score.
pub const SCORE_DECIMAL_PLACES: i32 = 2;

/// Penalty per eslint error.
const LINT_ERROR_PENALTY: f64 = 0.20;

/// Penalty per eslint warning.
const LINT_WARNING_PENALTY: f64 = 0.10;

/// The weights actually applied to each domain, and the blended mark.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted mark out of 1, rounded to [`SCORE_DECIMAL_PLACES`].
    pub final_score:     f64,
    /// Weight of the staff tests.
    pub test_factor:     f64,
    /// Weight of coverage; 0 when coverage is not assessed.
    pub coverage_factor: f64,
    /// Weight of lint; 0 when lint is not assessed.
    pub lint_factor:     f64,
}

/// Rounds `value` to `places` decimal places.
///
/// Goes through the exact decimal expansion of `value`, so `0.625` (stored
/// as exactly 0.625) ties to even and gives `0.62`, while `2.675` (stored
/// just below) gives `2.67`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let places = places.max(0) as usize;
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Fraction of staff tests passed, or 0 when there were none.
pub fn calculate_test_score(passed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    }
}

/// One minus a fixed penalty per error and warning, floored at 0.
pub fn calculate_lint_score(errors: u64, warnings: u64) -> f64 {
    let score =
        1.0 - LINT_ERROR_PENALTY * errors as f64 - LINT_WARNING_PENALTY * warnings as f64;
    score.max(0.0)
}

/// Mean of the four coverage percentages, scaled to 0-1.
///
/// Any metric at 0 zeroes the whole score.
pub fn calculate_coverage_score(line: f64, branch: f64, statement: f64, function: f64) -> f64 {
    let items = [line, branch, statement, function];
    if items.contains(&0.0) {
        return 0.0;
    }
    items.iter().sum::<f64>() / items.len() as f64 / 100.0
}

/// Blends the domain scores using the weights in `config`.
///
/// Domains switched off in `config` contribute neither score nor weight, and
/// their weight is not handed to the staff tests. The check against
/// over-allocation happens after that zeroing, so an unused factor can never
/// make a config invalid.
pub fn calculate_final_score(
    config: &MarkingConfig,
    test_score: f64,
    coverage_score: f64,
    lint_score: f64,
) -> Result<ScoreBreakdown, AutomarkError> {
    let (coverage_score, coverage_factor) = if config.coverage {
        (coverage_score, config.coverage_factor)
    } else {
        (0.0, 0.0)
    };
    let (lint_score, lint_factor) = if config.lint {
        (lint_score, config.lint_factor)
    } else {
        (0.0, 0.0)
    };

    let test_factor = round_to(1.0 - (coverage_factor + lint_factor), SCORE_DECIMAL_PLACES);

    if test_factor < 0.0 {
        return Err(AutomarkError::NegativeTestFactor { test_factor });
    }
    if test_factor + coverage_factor + lint_factor > 1.0 {
        return Err(AutomarkError::OverallocatedWeights {
            test_factor,
            coverage_factor,
            lint_factor,
        });
    }

    let final_score = round_to(
        test_score * test_factor + coverage_score * coverage_factor + lint_score * lint_factor,
        SCORE_DECIMAL_PLACES,
    );

    tracing::debug!(
        final_score,
        test_factor,
        coverage_factor,
        lint_factor,
        "calculated final score"
    );

    Ok(ScoreBreakdown {
        final_score,
        test_factor,
        coverage_factor,
        lint_factor,
    })
}
