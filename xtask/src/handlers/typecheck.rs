use std::fs;

use anyhow::{Context, Result};

use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::project::read_project_metadata;
use crate::services::venv::SessionEnv;

/// Type checks the package with mypy, writing an HTML report to
/// `build/typing/mypy`.
///
/// # Errors
///
/// Returns an error if an install fails or mypy reports type errors.
pub fn mypy(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let output_dir = layout.typing_dir("mypy");
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let venv = SessionEnv::prepare(layout, Session::TypecheckMypy, fresh)?;
    venv.install(&["mypy"])?;
    // The HTML report backend needs lxml at runtime.
    venv.install(&["lxml"])?;
    venv.install(&["-e", ".[dev]"])?;

    let project = read_project_metadata(layout)?;
    let cache_dir = output_dir.join(".mypy-cache");

    println!("🔍 Type checking '{}' with mypy...", project.package);
    venv.run(
        "mypy",
        &[
            "--non-interactive",
            "--install-types",
            "--pretty",
            "--disallow-any-generics",
            "--cache-dir",
            &path_arg(&cache_dir),
            "-p",
            &project.package,
            "--html-report",
            &path_arg(&output_dir),
        ],
    )
}

/// Type checks the checkout with pyright, capturing the report into
/// `build/typing/pyright/pyright.log`.
///
/// # Errors
///
/// Returns an error if an install fails or pyright reports type errors.
pub fn pyright(layout: &ProjectLayout, fresh: bool, posargs: &[String]) -> Result<()> {
    let output_dir = layout.typing_dir("pyright");
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let venv = SessionEnv::prepare(layout, Session::TypecheckPyright, fresh)?;
    venv.install(&["pyright"])?;
    venv.install(&["-e", ".[dev]"])?;

    println!("🔍 Type checking with pyright...");
    let args: Vec<&str> = posargs.iter().map(String::as_str).collect();
    venv.run_redirected("pyright", &args, &output_dir.join("pyright.log"))
}
