use anyhow::Result;

use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::project::read_project_metadata;
use crate::services::venv::SessionEnv;

/// Lints the package sources, tests, examples, and docs with flake8.
///
/// # Errors
///
/// Returns an error if an install fails or flake8 reports findings.
pub fn run(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::Lint, fresh)?;
    venv.install(&["flake8"])?;

    let project = read_project_metadata(layout)?;
    let config = layout.contrib_dir().join(".flake8");
    let package_dir = format!("./{}", project.package);

    println!("🔎 Linting the source tree...");
    venv.run(
        "flake8",
        &["--config", &path_arg(&config), &package_dir, "./tests", "./examples", "./docs"],
    )
}
