#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The automarking run as a fixed sequence of stages:
//! staff tests, student tests (coverage), lint, aggregate, cleanup.
//!
//! Every external tool runs exactly once. Nothing here retries.

use std::fmt::Display;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use crate::{
    config::MarkingConfig,
    grade::calculate_final_score,
    process::{self, RunOutcome, ServerGuard},
    report::{Report, write_artifact},
    results::{parse_coverage_results, parse_lint_results, parse_test_results},
    runner::{JestMode, Toolchain, eslint_args, jest_args, server_args},
    settings::Settings,
};

/// One step of an automarking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Staff automarking tests against the student's code.
    StaffTests,
    /// The student's own tests, run to measure coverage.
    StudentTests,
    /// Eslint over the student's code.
    Lint,
    /// Read results, score, report and write the artifact.
    Aggregate,
    /// Remove generated files (debug runs only).
    Cleanup,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::StaffTests,
        Stage::StudentTests,
        Stage::Lint,
        Stage::Aggregate,
        Stage::Cleanup,
    ];

    /// Whether this stage runs for the given config.
    pub fn is_enabled(&self, config: &MarkingConfig, cleanup: bool) -> bool {
        match self {
            Stage::StaffTests | Stage::Aggregate => true,
            Stage::StudentTests => config.coverage,
            Stage::Lint => config.lint,
            Stage::Cleanup => cleanup,
        }
    }

    /// Heading printed before a tool stage. The result and cleanup stages
    /// print their own output and have none.
    pub fn banner(&self) -> Option<ColoredString> {
        let text = format!(" \n=== {self} ===\n ");
        match self {
            Stage::StaffTests => Some(text.bright_yellow().bold()),
            Stage::StudentTests => Some(text.green().bold()),
            Stage::Lint => Some(text.magenta().bold()),
            Stage::Aggregate | Stage::Cleanup => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::StaffTests => "Staff Tests",
            Stage::StudentTests => "Student Tests",
            Stage::Lint => "Running Lint",
            Stage::Aggregate => "Results",
            Stage::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}

/// A single automarking run over one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Paths, timeouts and cleanup flag.
    settings:     Settings,
    /// What the lab asks to be assessed.
    config:       MarkingConfig,
    /// CI project name written to the artifact.
    project_name: String,
}

impl Pipeline {
    /// Creates a pipeline for `project_name`.
    pub fn new(settings: Settings, config: MarkingConfig, project_name: impl Into<String>) -> Self {
        Self {
            settings,
            config,
            project_name: project_name.into(),
        }
    }

    /// Returns the settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the marking config in use.
    pub fn config(&self) -> &MarkingConfig {
        &self.config
    }

    /// The stages this run will execute, in order.
    pub fn plan(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| stage.is_enabled(&self.config, self.settings.cleanup()))
            .collect()
    }

    /// Runs every enabled stage and returns the report shown to the student.
    pub async fn run(&self, toolchain: &Toolchain) -> Result<Report> {
        let mut report = None;

        for stage in self.plan() {
            if let Some(banner) = stage.banner() {
                println!("{banner}");
            }
            match stage {
                Stage::StaffTests => self.run_tests(toolchain, JestMode::Staff).await?,
                Stage::StudentTests => self.run_tests(toolchain, JestMode::Student).await?,
                Stage::Lint => self.run_lint(toolchain).await?,
                Stage::Aggregate => report = Some(self.aggregate()?),
                Stage::Cleanup => self.cleanup(),
            }
        }

        report.context("the aggregate stage did not run")
    }

    /// Runs one jest suite, inside a student server when configured.
    ///
    /// With a server, coverage is collected by the server process rather
    /// than by jest.
    async fn run_tests(&self, toolchain: &Toolchain, mode: JestMode) -> Result<()> {
        let coverage = mode == JestMode::Student;

        if !self.config.server {
            return self.jest(toolchain, coverage, mode).await;
        }

        let paths = self.settings.paths();
        let mut server = ServerGuard::start(
            toolchain.npx(),
            &server_args(paths, coverage),
            Some(paths.root_dir()),
        )?;
        server.await_ready(self.settings.server_boot()).await?;

        let result = self.jest(toolchain, false, mode).await;
        server.stop(self.settings.server_grace()).await?;
        result
    }

    /// A single jest invocation. A timeout is reported and otherwise ignored;
    /// whatever results file exists is scored later.
    async fn jest(&self, toolchain: &Toolchain, coverage: bool, mode: JestMode) -> Result<()> {
        let paths = self.settings.paths();
        let args = jest_args(
            paths,
            toolchain.jest_config(),
            toolchain.automarking_file(),
            coverage,
            mode,
        );

        let outcome = process::run_inherited(
            toolchain.npx(),
            &args,
            Some(paths.root_dir()),
            Some(self.settings.jest_timeout()),
        )
        .await?;

        match outcome {
            RunOutcome::TimedOut => {
                tracing::warn!(
                    "Jest timed out after {} seconds",
                    self.settings.jest_timeout().as_secs()
                );
            }
            RunOutcome::Exited(status) if !status.success() => {
                tracing::debug!("jest exited with {status}");
            }
            RunOutcome::Exited(_) => {}
        }

        Ok(())
    }

    /// Eslint once for the student to read, once more for the JSON results.
    async fn run_lint(&self, toolchain: &Toolchain) -> Result<()> {
        let paths = self.settings.paths();
        let root = Some(paths.root_dir());

        process::run_inherited(toolchain.npx(), &eslint_args(paths, false), root, None).await?;
        let outcome =
            process::run_inherited(toolchain.npx(), &eslint_args(paths, true), root, None).await?;

        if outcome.success() {
            println!("\nNo linting warnings or errors, well done!");
        }

        Ok(())
    }

    /// Reads whichever results this config assesses and scores them.
    ///
    /// Missing results files score 0; invalid weights are an error.
    pub fn score(&self) -> Result<Report> {
        let paths = self.settings.paths();

        let tests = parse_test_results(paths.test_results())?;
        let coverage = if self.config.coverage {
            Some(parse_coverage_results(paths.coverage_summary())?)
        } else {
            None
        };
        let lint = if self.config.lint {
            Some(parse_lint_results(paths.lint_results())?)
        } else {
            None
        };

        let breakdown = calculate_final_score(
            &self.config,
            tests.score,
            coverage.map_or(0.0, |c| c.score),
            lint.map_or(0.0, |l| l.score),
        )?;

        Ok(Report::builder()
            .tests(Some(tests))
            .coverage(coverage)
            .lint(lint)
            .breakdown(breakdown)
            .build())
    }

    /// Scores the run, prints the report and writes the artifact.
    pub fn aggregate(&self) -> Result<Report> {
        let report = self.score()?;
        println!("{}", report.render());

        write_artifact(
            self.settings.paths().artifact(),
            &self.project_name,
            report.breakdown.final_score,
        )?;
        tracing::info!("Wrote {}", self.settings.paths().artifact().display());

        Ok(report)
    }

    /// Removes generated files. Failures are logged and otherwise ignored.
    pub fn cleanup(&self) {
        println!("{}", "CLEANUP: Cleaning generated files".red().bold());

        for path in self.settings.paths().generated_files() {
            match std::fs::remove_file(&path) {
                Ok(()) => println!("- Removed '{}'.", path.display()),
                Err(e) => {
                    println!("- Failed to remove '{}'.", path.display());
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!("Could not remove {}: {e}", path.display());
                    }
                }
            }
        }
    }
}
