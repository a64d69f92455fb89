//! Docket CLI library.
//!
//! This library provides the core functionality for the Docket command-line interface,
//! including configuration management, batch files, command execution, and output formatting.

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use batch::BatchFile;
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
