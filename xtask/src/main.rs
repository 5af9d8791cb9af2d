#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod handlers;
pub mod models;
pub mod services;

use anyhow::{Result, bail};
use clap::Parser;
use lodestar_logger::{LevelFilter, Logger};

use crate::handlers::{dist, docs, docset, lint, list, multiversion, test, typecheck};
use crate::models::args::Cli;
use crate::models::env::EnvSnapshot;
use crate::models::layout::ProjectLayout;
use crate::models::session::{DEFAULT_SESSIONS, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let _logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).init()?;

    let invocation = match cli.command {
        Some(command) => match command.into_invocation() {
            Some(invocation) => Some(invocation),
            None => {
                list::run();
                return Ok(());
            },
        },
        None => None,
    };

    let layout = ProjectLayout::discover(cli.root.as_deref())?;
    let env = EnvSnapshot::capture();

    match invocation {
        Some((session, posargs)) => run_session(&layout, &env, cli.fresh, session, &posargs),
        None => run_default_sessions(&layout, &env, cli.fresh),
    }
}

fn run_session(
    layout: &ProjectLayout,
    env: &EnvSnapshot,
    fresh: bool,
    session: Session,
    posargs: &[String],
) -> Result<()> {
    match session {
        Session::Test => test::run(layout, env, fresh, posargs),
        Session::WatchDocs => docs::watch(layout, fresh),
        Session::BuildDocs => docs::build(layout, fresh),
        Session::BuildDocsMultiversion => multiversion::run(layout, fresh),
        Session::BuildDocset => docset::run(layout, fresh),
        Session::DistDocs => dist::docs_archive(layout, fresh),
        Session::LinkcheckDocs => docs::linkcheck(layout, fresh),
        Session::TypecheckMypy => typecheck::mypy(layout, fresh),
        Session::TypecheckPyright => typecheck::pyright(layout, fresh, posargs),
        Session::Lint => lint::run(layout, fresh),
        Session::Dist => dist::run(layout, fresh),
    }
}

fn run_default_sessions(layout: &ProjectLayout, env: &EnvSnapshot, fresh: bool) -> Result<()> {
    println!("🚀 Running the default sessions...");

    let mut results = Vec::with_capacity(DEFAULT_SESSIONS.len());
    for &session in DEFAULT_SESSIONS {
        println!("\nSession '{session}':");
        let result = run_session(layout, env, fresh, session, &[]);
        if let Err(error) = &result {
            println!("❌ Session '{session}' failed: {error:#}");
        }
        results.push((session, result.is_ok()));
    }

    println!("\nSession results:\n");
    for (session, passed) in &results {
        let state = if *passed { "✅ passed" } else { "❌ failed" };
        println!("  {:<26} {state}", session.to_string());
    }
    println!();

    let failed = results.iter().filter(|(_, passed)| !passed).count();
    if failed > 0 {
        bail!("{failed} of {} default sessions failed", DEFAULT_SESSIONS.len());
    }
    Ok(())
}
