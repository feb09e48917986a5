#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Readers for the JSON files written by jest, the coverage reporter and
//! eslint.
//!
//! A missing file is expected (the stage was skipped, crashed or timed out)
//! and yields the zero-valued record with a warning. Anything else wrong with
//! a file that does exist is an error.

use std::{fmt::Display, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grade::{calculate_coverage_score, calculate_lint_score, calculate_test_score};

/// Outcome of the staff tests.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TestResult {
    /// Tests that passed.
    pub passed: u64,
    /// Tests that failed.
    pub failed: u64,
    /// Tests that ran.
    pub total:  u64,
    /// `passed / total`.
    pub score:  f64,
}

impl TestResult {
    /// Builds a result from raw counts.
    pub fn new(passed: u64, failed: u64, total: u64) -> Self {
        Self {
            passed,
            failed,
            total,
            score: calculate_test_score(passed, total),
        }
    }
}

/// A single coverage percentage as reported by the coverage summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverageMetric {
    /// Percentage between 0 and 100.
    Percent(f64),
    /// Reported when nothing instrumentable was executed.
    Unknown,
}

impl CoverageMetric {
    /// Percentage value, with `Unknown` read as 0.
    pub fn value(&self) -> f64 {
        match self {
            CoverageMetric::Percent(pct) => *pct,
            CoverageMetric::Unknown => 0.0,
        }
    }

    /// Whether the metric was reported as unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, CoverageMetric::Unknown)
    }
}

impl Default for CoverageMetric {
    fn default() -> Self {
        CoverageMetric::Percent(0.0)
    }
}

impl Display for CoverageMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageMetric::Percent(pct) => write!(f, "{pct}"),
            CoverageMetric::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Coverage of the student's code by the student's tests.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageResult {
    /// Line coverage.
    pub line:      CoverageMetric,
    /// Statement coverage.
    pub statement: CoverageMetric,
    /// Function coverage.
    pub function:  CoverageMetric,
    /// Branch coverage.
    pub branch:    CoverageMetric,
    /// Aggregate coverage score; 0 unless every metric is non-zero.
    pub score:     f64,
}

impl CoverageResult {
    /// Builds a result from the four metrics.
    ///
    /// An unknown line metric means nothing was measured, so all four are
    /// recorded as 0.
    pub fn new(
        line: CoverageMetric,
        statement: CoverageMetric,
        function: CoverageMetric,
        branch: CoverageMetric,
    ) -> Self {
        let (line, statement, function, branch) = if line.is_unknown() {
            let zero = CoverageMetric::Percent(0.0);
            (zero, zero, zero, zero)
        } else {
            (line, statement, function, branch)
        };

        let score =
            calculate_coverage_score(line.value(), branch.value(), statement.value(), function.value());

        Self {
            line,
            statement,
            function,
            branch,
            score,
        }
    }
}

/// Eslint findings across the linted files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Total errors.
    pub errors:   u64,
    /// Total warnings.
    pub warnings: u64,
    /// Penalty-based lint score, floored at 0.
    pub score:    f64,
}

impl LintResult {
    /// Builds a result from raw counts.
    pub fn new(errors: u64, warnings: u64) -> Self {
        Self {
            errors,
            warnings,
            score: calculate_lint_score(errors, warnings),
        }
    }
}

/// The subset of jest's `--json` output the automarker reads.
#[derive(Debug, Deserialize)]
struct JestSummary {
    /// `numPassedTests`
    #[serde(rename = "numPassedTests", default)]
    passed: u64,
    /// `numFailedTests`
    #[serde(rename = "numFailedTests", default)]
    failed: u64,
    /// `numTotalTests`
    #[serde(rename = "numTotalTests", default)]
    total:  u64,
}

/// A `pct` field, which is a number or the string `"Unknown"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPct {
    /// Reported percentage
    Number(f64),
    /// Textual value; only `"Unknown"` is accepted
    Text(String),
}

impl TryFrom<RawPct> for CoverageMetric {
    type Error = anyhow::Error;

    fn try_from(raw: RawPct) -> Result<Self> {
        match raw {
            RawPct::Number(pct) => Ok(CoverageMetric::Percent(pct)),
            RawPct::Text(text) if text == "Unknown" => Ok(CoverageMetric::Unknown),
            RawPct::Text(text) => anyhow::bail!("unexpected coverage percentage {text:?}"),
        }
    }
}

/// One metric object in the coverage summary.
#[derive(Debug, Deserialize)]
struct RawMetric {
    /// Percentage covered
    pct: RawPct,
}

/// The `total` object of `coverage-summary.json`.
#[derive(Debug, Deserialize)]
struct RawCoverageTotals {
    /// Line coverage
    lines:      RawMetric,
    /// Branch coverage
    branches:   RawMetric,
    /// Statement coverage
    statements: RawMetric,
    /// Function coverage
    functions:  RawMetric,
}

/// `coverage-summary.json`; per-file entries are ignored.
#[derive(Debug, Deserialize)]
struct RawCoverageSummary {
    /// Project-wide totals
    total: RawCoverageTotals,
}

/// One file's entry in eslint's JSON output.
#[derive(Debug, Deserialize)]
struct RawLintEntry {
    /// Errors in this file
    #[serde(rename = "errorCount", default)]
    error_count:   u64,
    /// Warnings in this file
    #[serde(rename = "warningCount", default)]
    warning_count: u64,
}

/// Reads `path`, or returns `None` with a warning if it does not exist.
fn read_if_present(path: &Path, tool: &str) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Failed to read {tool} results ({} not found)", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
    }
}

/// Reads jest's JSON results for the staff tests.
pub fn parse_test_results(path: &Path) -> Result<TestResult> {
    let Some(contents) = read_if_present(path, "jest")? else {
        return Ok(TestResult::default());
    };

    let summary: JestSummary = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse jest results in {}", path.display()))?;

    Ok(TestResult::new(summary.passed, summary.failed, summary.total))
}

/// Reads the `total` section of a coverage summary.
pub fn parse_coverage_results(path: &Path) -> Result<CoverageResult> {
    let Some(contents) = read_if_present(path, "coverage")? else {
        return Ok(CoverageResult::default());
    };

    let summary: RawCoverageSummary = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse coverage summary in {}", path.display()))?;
    let total = summary.total;
    let metric = |raw: RawMetric| {
        CoverageMetric::try_from(raw.pct)
            .with_context(|| format!("Invalid coverage summary in {}", path.display()))
    };

    Ok(CoverageResult::new(
        metric(total.lines)?,
        metric(total.statements)?,
        metric(total.functions)?,
        metric(total.branches)?,
    ))
}

/// Sums errors and warnings over every file in eslint's JSON output.
pub fn parse_lint_results(path: &Path) -> Result<LintResult> {
    let Some(contents) = read_if_present(path, "eslint")? else {
        return Ok(LintResult::default());
    };

    let entries: Vec<RawLintEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse eslint results in {}", path.display()))?;

    let (errors, warnings) = entries.iter().fold((0, 0), |(errors, warnings), entry| {
        (errors + entry.error_count, warnings + entry.warning_count)
    });

    Ok(LintResult::new(errors, warnings))
}
