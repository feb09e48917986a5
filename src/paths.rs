#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use bon::builder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Represents where the automarker reads and writes files for one project.
pub struct ProjectPaths {
    /// Root directory of the student project.
    root_dir:         PathBuf,
    /// `automarking-config.json` provided by the lab.
    config_file:      PathBuf,
    /// Jest `--json` output for the staff tests.
    test_results:     PathBuf,
    /// `coverage/coverage-summary.json` written by the coverage reporter.
    coverage_summary: PathBuf,
    /// Eslint `--format=json` output.
    lint_results:     PathBuf,
    /// `mark.txt` consumed by the CI pipeline.
    artifact:         PathBuf,
    /// `src/` directory linted by eslint.
    source_dir:       PathBuf,
}

impl ProjectPaths {
    /// Creates a new set of project paths rooted at `root_dir`.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::build_with_defaults(root_dir, None, None, None, None, None, None)
    }

    /// Root directory for the project.
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_path()
    }

    /// Marking config file.
    pub fn config_file(&self) -> &Path {
        self.config_file.as_path()
    }

    /// Jest JSON results for the staff tests.
    pub fn test_results(&self) -> &Path {
        self.test_results.as_path()
    }

    /// Coverage summary JSON.
    pub fn coverage_summary(&self) -> &Path {
        self.coverage_summary.as_path()
    }

    /// Eslint JSON results.
    pub fn lint_results(&self) -> &Path {
        self.lint_results.as_path()
    }

    /// The mark artifact.
    pub fn artifact(&self) -> &Path {
        self.artifact.as_path()
    }

    /// Source directory of the student project.
    pub fn source_dir(&self) -> &Path {
        self.source_dir.as_path()
    }

    /// Jest config shipped with the lab, if any.
    pub fn existing_jest_config(&self) -> PathBuf {
        self.root_dir.join("jest.config.js")
    }

    /// Jest config the automarker generates when the lab has none.
    ///
    /// `.cjs` so it loads in projects with `{ "type": "module" }`.
    pub fn generated_jest_config(&self) -> PathBuf {
        self.root_dir.join("jest.config.cjs")
    }

    /// Entry point of the student server, relative to the project root.
    pub fn server_entry(&self) -> PathBuf {
        self.source_dir.join("server")
    }

    /// Files a debug run removes when it finishes.
    pub fn generated_files(&self) -> Vec<PathBuf> {
        vec![
            self.generated_jest_config(),
            self.lint_results.clone(),
            self.artifact.clone(),
            self.test_results.clone(),
        ]
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl ProjectPaths {
    /// Centralized constructor that applies standard defaults when overrides
    /// are absent.
    fn build_with_defaults(
        root_dir: PathBuf,
        config_file: Option<PathBuf>,
        test_results: Option<PathBuf>,
        coverage_summary: Option<PathBuf>,
        lint_results: Option<PathBuf>,
        artifact: Option<PathBuf>,
        source_dir: Option<PathBuf>,
    ) -> Self {
        let config_file = config_file.unwrap_or_else(|| root_dir.join("automarking-config.json"));
        let test_results =
            test_results.unwrap_or_else(|| root_dir.join("__automarking_test__.json"));
        let coverage_summary = coverage_summary
            .unwrap_or_else(|| root_dir.join("coverage").join("coverage-summary.json"));
        let lint_results =
            lint_results.unwrap_or_else(|| root_dir.join("__eslint_result___.json"));
        let artifact = artifact.unwrap_or_else(|| root_dir.join("mark.txt"));
        let source_dir = source_dir.unwrap_or_else(|| root_dir.join("src"));

        Self {
            root_dir,
            config_file,
            test_results,
            coverage_summary,
            lint_results,
            artifact,
            source_dir,
        }
    }
}

/// Builder-friendly constructor for `ProjectPaths` with optional overrides.
#[builder(finish_fn = build)]
pub fn project_paths(
    #[builder(into)] root_dir: PathBuf,
    config_file: Option<PathBuf>,
    test_results: Option<PathBuf>,
    coverage_summary: Option<PathBuf>,
    lint_results: Option<PathBuf>,
    artifact: Option<PathBuf>,
    source_dir: Option<PathBuf>,
) -> ProjectPaths {
    ProjectPaths::build_with_defaults(
        root_dir,
        config_file,
        test_results,
        coverage_summary,
        lint_results,
        artifact,
        source_dir,
    )
}
