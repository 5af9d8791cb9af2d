use anyhow::Result;

use crate::handlers::{docs, docset};
use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::archive::make_zip_archive;
use crate::services::project::read_project_metadata;
use crate::services::venv::SessionEnv;

/// Builds source and wheel distributions into `build/dist`.
///
/// # Errors
///
/// Returns an error if an install fails or the build backend exits with
/// a failure.
pub fn run(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::Dist, fresh)?;
    venv.install(&["build"])?;

    println!("📦 Building source and wheel distributions...");
    venv.run("python", &["-m", "build", "-o", &path_arg(&layout.dist_dir())])
}

/// Builds the HTML documentation and archives it as a versioned zip in
/// `build/`.
///
/// # Errors
///
/// Returns an error if the documentation build or the archive step
/// fails.
pub fn docs_archive(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::DistDocs, fresh)?;
    docs::build_html(&venv, layout)?;

    let project = read_project_metadata(layout)?;
    let version = docset::installed_version(&venv, &project.package)?;

    let archive = make_zip_archive(
        &layout.build_dir(),
        "docs",
        &format!("{}-{version}-docs", project.package),
    )?;
    println!("✅ Documentation archived at {}", archive.display());
    Ok(())
}
