//! # CLI Argument Definitions
//!
//! This module defines the command-line interface (CLI) structure using the `clap` crate.
//! It specifies the available sessions, their forwarded arguments, and the global flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::session::Session;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Developer task runner for the Lodestar project")]
pub struct Cli {
    /// Path of the Lodestar checkout (defaults to the workspace directory)
    #[arg(long, global = true, env = "LODESTAR_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Recreate session environments instead of reusing them
    #[arg(long, global = true)]
    pub fresh: bool,

    /// Enable debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The session to run; omit it to run the default set
    #[command(subcommand)]
    pub command: Option<SessionCommand>,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Run the unit test suite
    Test {
        /// Extra arguments forwarded to the test runner (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Serve the documentation with live rebuild
    WatchDocs {},
    /// Build the HTML documentation
    BuildDocs {},
    /// Build documentation for every release tag
    BuildDocsMultiversion {},
    /// Build a Dash/Zeal docset from the HTML documentation
    BuildDocset {},
    /// Build and archive the HTML documentation
    DistDocs {},
    /// Validate external links in the documentation
    LinkcheckDocs {},
    /// Type check the package with mypy
    TypecheckMypy {},
    /// Type check the package with pyright
    TypecheckPyright {
        /// Extra arguments forwarded to pyright (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Lint the source tree with flake8
    Lint {},
    /// Build source and wheel distributions
    Dist {},
    /// List available sessions
    List {},
}

impl SessionCommand {
    /// Splits the command into its session and forwarded arguments.
    /// `list` is not a session and yields `None`.
    #[must_use]
    pub fn into_invocation(self) -> Option<(Session, Vec<String>)> {
        match self {
            Self::Test { args } => Some((Session::Test, args)),
            Self::WatchDocs {} => Some((Session::WatchDocs, Vec::new())),
            Self::BuildDocs {} => Some((Session::BuildDocs, Vec::new())),
            Self::BuildDocsMultiversion {} => Some((Session::BuildDocsMultiversion, Vec::new())),
            Self::BuildDocset {} => Some((Session::BuildDocset, Vec::new())),
            Self::DistDocs {} => Some((Session::DistDocs, Vec::new())),
            Self::LinkcheckDocs {} => Some((Session::LinkcheckDocs, Vec::new())),
            Self::TypecheckMypy {} => Some((Session::TypecheckMypy, Vec::new())),
            Self::TypecheckPyright { args } => Some((Session::TypecheckPyright, args)),
            Self::Lint {} => Some((Session::Lint, Vec::new())),
            Self::Dist {} => Some((Session::Dist, Vec::new())),
            Self::List {} => None,
        }
    }
}
