#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # automark
//!
//! Marks a student lab in CI: runs the staff automarking tests, and
//! optionally coverage and lint, then prints a report and writes `mark.txt`.
//!
//! ```text
//! automark $CI_PROJECT_NAME [OPTIONAL_DIR_PATH]
//! ```
//!
//! Passing a directory changes into it first and removes generated files at
//! the end, which is handy when debugging a submission locally.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use automark::{
    AutomarkError, Pipeline, Settings, load_config, paths::project_paths, runner,
    runner::Toolchain,
};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Command line arguments.
#[derive(Debug, Clone)]
struct Options {
    /// CI project name, written to the artifact
    project_name: String,
    /// Directory to mark instead of the current one
    dir:          Option<PathBuf>,
    /// Overrides the jest budget
    jest_timeout: Option<Duration>,
    /// Overrides the server boot delay
    server_boot:  Option<Duration>,
    /// Overrides the server shutdown grace period
    server_grace: Option<Duration>,
}

/// Parse the command line arguments
fn options() -> Options {
    let project_name = positional::<String>("PROJECT_NAME")
        .help("CI project name, e.g. $CI_PROJECT_NAME");
    let jest_timeout = long("jest-timeout")
        .help("Seconds each jest run may take (default 120)")
        .argument::<u64>("SECS")
        .map(Duration::from_secs)
        .optional();
    let server_boot = long("server-boot")
        .help("Seconds the student server is given to start (default 5)")
        .argument::<u64>("SECS")
        .map(Duration::from_secs)
        .optional();
    let server_grace = long("server-grace")
        .help("Seconds the student server is given to exit (default 2)")
        .argument::<u64>("SECS")
        .map(Duration::from_secs)
        .optional();
    let dir = positional::<PathBuf>("DIR")
        .help("Directory to mark; also removes generated files afterwards")
        .optional();

    construct!(Options {
        jest_timeout,
        server_boot,
        server_grace,
        project_name,
        dir
    })
        .to_options()
        .descr("Automarks a lab: staff tests, optional coverage and lint")
        .run()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let opts = options();

    if let Some(dir) = &opts.dir {
        println!("cd {}", dir.display());
        std::env::set_current_dir(dir)
            .map_err(|_| AutomarkError::WorkingDirectory(dir.clone()))?;
    }

    let mut settings =
        Settings::new(project_paths().root_dir(".").build()).with_cleanup(opts.dir.is_some());
    if let Some(jest_timeout) = opts.jest_timeout {
        settings = settings.with_jest_timeout(jest_timeout);
    }
    if let Some(server_boot) = opts.server_boot {
        settings = settings.with_server_boot(server_boot);
    }
    if let Some(server_grace) = opts.server_grace {
        settings = settings.with_server_grace(server_grace);
    }
    let toolchain = Toolchain::discover(&settings)?;

    println!("{}", format!(" \nAutomarking {}", opts.project_name).bold());
    runner::git_log(&settings).await;

    let config = load_config(settings.paths().config_file())?;
    let pipeline = Pipeline::new(settings, config, opts.project_name);
    pipeline.run(&toolchain).await?;

    Ok(())
}
