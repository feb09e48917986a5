#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// University grade bands, plus a sentinel for impossible percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    /// 85-100
    HighDistinction,
    /// 75-84
    Distinction,
    /// 65-74
    Credit,
    /// 50-64
    Pass,
    /// 0-49
    Fail,
    /// The percentage was outside 0-100; something upstream went wrong.
    NotifyStaff,
}

impl Display for GradeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GradeBand::HighDistinction => "High Distinction (HD, 85-100)",
            GradeBand::Distinction => "Distinction (DN, 75-84)",
            GradeBand::Credit => "Credit (CR, 65-74)",
            GradeBand::Pass => "Pass (PS, 50-64)",
            GradeBand::Fail => "Fail (FL, 0-49)",
            GradeBand::NotifyStaff => "Error: Please notify a staff!",
        };
        f.write_str(label)
    }
}

/// Maps a whole percentage onto its grade band. Thresholds are inclusive.
pub fn calculate_grade(percentage: i64) -> GradeBand {
    match percentage {
        p if !(0..=100).contains(&p) => GradeBand::NotifyStaff,
        85.. => GradeBand::HighDistinction,
        75.. => GradeBand::Distinction,
        65.. => GradeBand::Credit,
        50.. => GradeBand::Pass,
        _ => GradeBand::Fail,
    }
}

/// Converts a final score out of 1 to a whole percentage.
pub fn percentage_of(final_score: f64) -> i64 {
    (final_score * 100.0).round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_closed_below() {
        assert_eq!(calculate_grade(100), GradeBand::HighDistinction);
        assert_eq!(calculate_grade(85), GradeBand::HighDistinction);
        assert_eq!(calculate_grade(84), GradeBand::Distinction);
        assert_eq!(calculate_grade(75), GradeBand::Distinction);
        assert_eq!(calculate_grade(74), GradeBand::Credit);
        assert_eq!(calculate_grade(65), GradeBand::Credit);
        assert_eq!(calculate_grade(64), GradeBand::Pass);
        assert_eq!(calculate_grade(50), GradeBand::Pass);
        assert_eq!(calculate_grade(49), GradeBand::Fail);
        assert_eq!(calculate_grade(0), GradeBand::Fail);
    }

    #[test]
    fn out_of_range_notifies_staff() {
        assert_eq!(calculate_grade(-1), GradeBand::NotifyStaff);
        assert_eq!(calculate_grade(101), GradeBand::NotifyStaff);
        assert_eq!(calculate_grade(-1).to_string(), "Error: Please notify a staff!");
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage_of(0.84), 84);
        assert_eq!(percentage_of(0.57), 57);
        assert_eq!(percentage_of(1.0), 100);
        assert_eq!(percentage_of(0.0), 0);
    }
}
