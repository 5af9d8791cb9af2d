use std::fs;

use anyhow::{Context, Result, bail};

use crate::handlers::docs;
use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::archive::make_zip_archive;
use crate::services::project::read_project_metadata;
use crate::services::venv::{RunOptions, SessionEnv};

/// Builds the HTML documentation and packages it as a Dash/Zeal docset
/// archive in `build/`.
///
/// # Errors
///
/// Returns an error if the documentation build, the docset generation,
/// or the archive step fails.
pub fn run(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::BuildDocset, fresh)?;
    docs::build_html(&venv, layout)?;

    venv.install(&["doc2dash"])?;

    let project = read_project_metadata(layout)?;
    let version = installed_version(&venv, &project.package)?;

    let build_dir = layout.build_dir();
    let docset_name = format!("{}.docset", project.display_name);
    let docset_dir = build_dir.join(&docset_name);
    if docset_dir.exists() {
        // doc2dash refuses to overwrite an existing docset.
        fs::remove_dir_all(&docset_dir).with_context(|| {
            format!("Failed to remove the stale docset at {}", docset_dir.display())
        })?;
    }

    println!("📦 Generating the {} docset...", project.display_name);
    venv.run_with(
        "doc2dash",
        &[
            "-n",
            &project.display_name,
            "-j",
            "--full-text-search",
            "on",
            &path_arg(&layout.docs_output_dir()),
        ],
        &RunOptions { cwd: Some(&build_dir), env: None },
    )?;

    let archive = make_zip_archive(
        &build_dir,
        &docset_name,
        &format!("{}-{version}-docset", project.package),
    )?;
    println!("✅ Docset archived at {}", archive.display());
    Ok(())
}

/// Asks the environment's interpreter for the installed package version.
///
/// # Errors
///
/// Returns an error if the interpreter fails or reports nothing.
pub(crate) fn installed_version(venv: &SessionEnv, package: &str) -> Result<String> {
    let probe = format!("import {package};print({package}.__version__)");
    let stdout = venv.run_captured("python", &["-c", &probe])?;

    let version = stdout.trim();
    if version.is_empty() {
        bail!("Could not determine the installed version of {package}");
    }
    Ok(version.to_owned())
}
