//! # automark
//!
//! A CI automarking tool for course labs: runs the staff automarking tests,
//! optionally measures coverage and lint quality, and combines them into a
//! weighted mark.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Per-lab marking configuration loaded from `automarking-config.json`
pub mod config;
/// Fatal error taxonomy
pub mod error;
/// For all things related to scoring and grade bands
pub mod grade;
/// Where every generated file lives
pub mod paths;
/// The linear automarking pipeline
pub mod pipeline;
/// Subprocess helpers and the student server guard
pub mod process;
/// Console report rendering and the CI artifact
pub mod report;
/// Parsers for jest, coverage and eslint JSON output
pub mod results;
/// Test file discovery and tool command lines
pub mod runner;
/// Run-wide settings passed to every stage
pub mod settings;

pub use config::{MarkingConfig, load_config};
pub use error::AutomarkError;
pub use pipeline::{Pipeline, Stage};
pub use settings::Settings;
