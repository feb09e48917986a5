#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};
use typed_builder::TypedBuilder;

use crate::{
    grade::{ScoreBreakdown, calculate_grade, percentage_of},
    results::{CoverageResult, LintResult, TestResult},
};

/// Horizontal rule under and over each section title.
const RULE: &str = "===============================================";

/// Shown under the coverage heading so students read the number in context.
const COVERAGE_NOTE: &str = "  Note:
  - This is one way we have chosen to
  quantify your test quality.
  - Higher coverage can be achieved by
  testing many different scenarios.
  - This topic is not covered until week 8,
  so interpret the result however you like
  or conduct YOUR OWN further research.";

/// Everything shown at the end of a run.
///
/// A domain left as `None` was not measured and gets no section.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct Report {
    /// Staff test results.
    #[builder(default)]
    pub tests:     Option<TestResult>,
    /// Coverage results.
    #[builder(default)]
    pub coverage:  Option<CoverageResult>,
    /// Lint results.
    #[builder(default)]
    pub lint:      Option<LintResult>,
    /// Weights applied and the final mark.
    pub breakdown: ScoreBreakdown,
}

/// One row of the score breakdown table.
#[derive(Tabled)]
struct SummaryRow {
    /// Assessed domain
    #[tabled(rename = "Component")]
    component: &'static str,
    /// Weight applied to it
    #[tabled(rename = "Weighting")]
    weighting: String,
    /// Score out of 1
    #[tabled(rename = "Score")]
    score:     String,
}

impl Report {
    /// Percentage shown to the student.
    pub fn percentage(&self) -> i64 {
        percentage_of(self.breakdown.final_score)
    }

    /// Renders the full console report.
    pub fn render(&self) -> String {
        let b = &self.breakdown;
        let mut sections = vec![" \n ".to_string()];

        if let Some(tests) = &self.tests {
            sections.push(
                [
                    RULE.bright_green().to_string(),
                    format!("JEST (weighting: {})", format_score(b.test_factor))
                        .green()
                        .bold()
                        .to_string(),
                    "- Staff automarking on student code".to_string(),
                    RULE.bright_green().to_string(),
                    format!("Tests Passed   : {}", tests.passed),
                    format!("Tests Failed   : {}", tests.failed),
                    format!("Tests Total    : {}", tests.total),
                    format!("Test Score     : {:.2}/1", tests.score)
                        .bright_green()
                        .to_string(),
                    " \n ".to_string(),
                ]
                .join("\n"),
            );
        }

        if let Some(coverage) = &self.coverage {
            sections.push(
                [
                    RULE.bright_yellow().to_string(),
                    format!("COVERAGE (weighting: {})", format_score(b.coverage_factor))
                        .yellow()
                        .bold()
                        .to_string(),
                    "- Student or given tests on student code".to_string(),
                    COVERAGE_NOTE.to_string(),
                    RULE.bright_yellow().to_string(),
                    format!("Line           : {}%", coverage.line),
                    format!("Statement      : {}%", coverage.statement),
                    format!("Function       : {}%", coverage.function),
                    format!("Branch         : {}%", coverage.branch),
                    format!("Coverage Score : {:.2}/1", coverage.score)
                        .bright_yellow()
                        .to_string(),
                    " \n ".to_string(),
                ]
                .join("\n"),
            );
        }

        if let Some(lint) = &self.lint {
            sections.push(
                [
                    RULE.bright_magenta().to_string(),
                    format!("ESLINT (weighting: {})", format_score(b.lint_factor))
                        .magenta()
                        .bold()
                        .to_string(),
                    "- Staff lint on student code".to_string(),
                    RULE.bright_magenta().to_string(),
                    format!("Errors         : {}", lint.errors),
                    format!("Warnings       : {}", lint.warnings),
                    format!("Lint Score     : {:.2}/1", lint.score)
                        .bright_magenta()
                        .to_string(),
                    " \n ".to_string(),
                ]
                .join("\n"),
            );
        }

        let percentage = self.percentage();
        sections.push(
            [
                RULE.bright_blue().to_string(),
                "AUTOMARKING RESULT".blue().bold().to_string(),
                "- Combined score of all components".to_string(),
                RULE.bright_blue().to_string(),
                format!("Percentage     : {percentage}%"),
                format!("Final Grade    : {}", calculate_grade(percentage)),
                format!("Final Score    : {:.2}/1", b.final_score)
                    .bright_blue()
                    .to_string(),
                " \n ".to_string(),
            ]
            .join("\n"),
        );
        sections.push(self.summary_table().to_string());

        sections.join("\n")
    }

    /// Weighting and score of every measured domain as a table.
    fn summary_table(&self) -> Table {
        let b = &self.breakdown;
        let mut rows = Vec::new();

        if let Some(tests) = &self.tests {
            rows.push(SummaryRow {
                component: "Tests",
                weighting: format_score(b.test_factor),
                score:     format!("{:.2}", tests.score),
            });
        }
        if let Some(coverage) = &self.coverage {
            rows.push(SummaryRow {
                component: "Coverage",
                weighting: format_score(b.coverage_factor),
                score:     format!("{:.2}", coverage.score),
            });
        }
        if let Some(lint) = &self.lint {
            rows.push(SummaryRow {
                component: "Lint",
                weighting: format_score(b.lint_factor),
                score:     format!("{:.2}", lint.score),
            });
        }

        let mut table = Table::new(&rows);
        table
            .with(Panel::header("Score Breakdown"))
            .with(Panel::footer(format!("Final: {:.2}/1", b.final_score)))
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Rows::last()).with(Alignment::center()))
            .with(Style::modern());
        table
    }
}

/// Formats a score with at least one decimal digit: `0.84`, `1.0`, `0.0`.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

/// The artifact line read by the CI grading pipeline.
pub fn artifact_line(project_name: &str, final_score: f64) -> String {
    format!("{project_name}|{}|", format_score(final_score))
}

/// Writes the artifact, replacing any previous one.
pub fn write_artifact(path: &Path, project_name: &str, final_score: f64) -> Result<()> {
    std::fs::write(path, artifact_line(project_name, final_score))
        .with_context(|| format!("Could not write artifact {}", path.display()))
}
