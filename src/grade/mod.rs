#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Grade bands derived from the final percentage.
pub mod band;
/// Per-domain scores and the weighted final mark.
pub mod score;

pub use band::{GradeBand, calculate_grade, percentage_of};
pub use score::{
    SCORE_DECIMAL_PLACES, ScoreBreakdown, calculate_coverage_score, calculate_final_score,
    calculate_lint_score, calculate_test_score, round_to,
};
