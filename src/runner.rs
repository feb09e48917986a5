#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Finding the staff test file and building the command lines for jest,
//! eslint, the student server and git.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::{Pattern, glob};
use which::which;

use crate::{
    error::AutomarkError,
    paths::ProjectPaths,
    process::{self, RunOutcome},
    settings::Settings,
};

/// Glob matching the staff automarking test file.
pub const AUTOMARKING_TEST_GLOB: &str = "automarking.test.[jt]s";

/// Contents of the jest config generated for labs that ship without one.
const GENERATED_JEST_CONFIG: &str = "const config = {\n  verbose: true,\n};\n\nmodule.exports = \
                                     config;\n";

/// Pretty format used by the git log banner.
const GIT_LOG_FORMAT: &str = "--pretty=tformat:%Cred%h%Creset -%C(yellow)%d%Creset %s \
                              %Cgreen(%cD) %C(bold blue)%an%Creset";

/// Which suite a jest run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JestMode {
    /// Only the staff automarking file, with JSON results written out.
    Staff,
    /// Every test except the staff automarking file.
    Student,
}

/// The external pieces every tool invocation needs, resolved once per run.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Path to `npx`.
    npx:              OsString,
    /// The staff automarking test file.
    automarking_file: PathBuf,
    /// Jest config passed to every jest run.
    jest_config:      PathBuf,
}

impl Toolchain {
    /// A toolchain from already-resolved parts.
    pub fn new(
        npx: impl Into<OsString>,
        automarking_file: impl Into<PathBuf>,
        jest_config: impl Into<PathBuf>,
    ) -> Self {
        Self {
            npx:              npx.into(),
            automarking_file: automarking_file.into(),
            jest_config:      jest_config.into(),
        }
    }

    /// Locates `npx`, the staff test file and a jest config for the project.
    ///
    /// Fails if there is not exactly one automarking test file.
    pub fn discover(settings: &Settings) -> Result<Self> {
        let paths = settings.paths();
        let automarking_file = find_automarking_file(paths.root_dir())?;
        let jest_config = ensure_jest_config(paths)?;
        let npx = npx_path()?;

        Ok(Self::new(npx, automarking_file, jest_config))
    }

    /// Path to `npx`.
    pub fn npx(&self) -> &OsStr {
        &self.npx
    }

    /// The staff automarking test file.
    pub fn automarking_file(&self) -> &Path {
        &self.automarking_file
    }

    /// Jest config in use.
    pub fn jest_config(&self) -> &Path {
        &self.jest_config
    }
}

/// Finds and returns the path to npx
pub fn npx_path() -> Result<OsString> {
    which("npx")
        .map(PathBuf::into_os_string)
        .context("Cannot find npx on path (is Node.js installed?)")
}

/// Finds the one staff automarking test file in `root`.
pub fn find_automarking_file(root: &Path) -> Result<PathBuf, AutomarkError> {
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        AUTOMARKING_TEST_GLOB
    );

    let mut found: Vec<PathBuf> = glob(&pattern)
        .map(|paths| paths.filter_map(Result::ok).collect())
        .unwrap_or_default();
    found.sort();

    match found.as_slice() {
        [single] => Ok(single.clone()),
        _ => Err(AutomarkError::AutomarkingFileDiscovery { found }),
    }
}

/// Returns the lab's `jest.config.js`, or writes and returns a minimal
/// `jest.config.cjs` when there is none.
pub fn ensure_jest_config(paths: &ProjectPaths) -> Result<PathBuf> {
    let existing = paths.existing_jest_config();
    if existing.exists() {
        return Ok(existing);
    }

    let generated = paths.generated_jest_config();
    std::fs::write(&generated, GENERATED_JEST_CONFIG)
        .with_context(|| format!("Could not write {}", generated.display()))?;
    tracing::debug!("Generated {}", generated.display());
    Ok(generated)
}

/// Expresses `path` relative to the project root, where every tool runs.
fn from_root(paths: &ProjectPaths, path: &Path) -> OsString {
    path.strip_prefix(paths.root_dir())
        .unwrap_or(path)
        .as_os_str()
        .to_os_string()
}

/// Arguments to `npx` for one jest run.
///
/// * `jest_config`: config file passed with `--config`
/// * `automarking_file`: the staff test file
/// * `coverage`: whether jest should collect coverage itself
/// * `mode`: staff or student suite
pub fn jest_args(
    paths: &ProjectPaths,
    jest_config: &Path,
    automarking_file: &Path,
    coverage: bool,
    mode: JestMode,
) -> Vec<OsString> {
    let automarking_name = automarking_file
        .file_name()
        .unwrap_or(automarking_file.as_os_str())
        .to_os_string();

    let mut config_arg = OsString::from("--config=");
    config_arg.push(from_root(paths, jest_config));

    let mut args: Vec<OsString> = vec![
        "jest".into(),
        "--colors".into(),
        "--verbose".into(),
        "--runInBand".into(),
        config_arg,
    ];

    if coverage {
        args.extend([
            OsString::from("--coverage"),
            OsString::from("--coverageReporters=text"),
            OsString::from("--coverageReporters=json-summary"),
        ]);
    }

    match mode {
        JestMode::Staff => {
            let mut output_arg = OsString::from("--outputFile=");
            output_arg.push(from_root(paths, paths.test_results()));
            args.extend([OsString::from("--json"), output_arg, automarking_name]);
        }
        JestMode::Student => {
            let mut ignore_arg = OsString::from("--testPathIgnorePatterns=");
            ignore_arg.push(automarking_name);
            args.push(ignore_arg);
        }
    }

    args
}

/// Arguments to `npx` that start the student server, under the coverage
/// reporter when `coverage` is set.
pub fn server_args(paths: &ProjectPaths, coverage: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if coverage {
        args.extend([OsString::from("nyc"), OsString::from("--reporter=json-summary")]);
    }
    args.extend([OsString::from("ts-node"), from_root(paths, &paths.server_entry())]);
    args
}

/// Arguments to `npx` for eslint; `json` switches output to the results file.
pub fn eslint_args(paths: &ProjectPaths, json: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "eslint".into(),
        "--color".into(),
        from_root(paths, paths.source_dir()),
        "./**.js".into(),
    ];

    if json {
        let mut output_arg = OsString::from("--output-file=");
        output_arg.push(from_root(paths, paths.lint_results()));
        args.extend([OsString::from("--format=json"), output_arg]);
    }

    args
}

/// Arguments to `git` for the commit log banner.
pub fn git_log_args(num_commits: usize) -> Vec<OsString> {
    vec![
        "log".into(),
        format!("-{num_commits}").into(),
        "--color".into(),
        "--graph".into(),
        "--abbrev-commit".into(),
        GIT_LOG_FORMAT.into(),
    ]
}

/// Prints the last few commits of the student repository. Failures are only
/// logged.
pub async fn git_log(settings: &Settings) {
    println!(
        "{}",
        format!(" \n=== Git Log (last {} commits) ===\n ", settings.num_commits())
            .red()
            .bold()
    );

    let outcome = process::run_inherited(
        "git",
        &git_log_args(settings.num_commits()),
        Some(settings.paths().root_dir()),
        None,
    )
    .await;

    match outcome {
        Ok(RunOutcome::Exited(status)) if !status.success() => {
            tracing::warn!("git log exited with {status}");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not run git log: {e:#}"),
    }
}
