use anyhow::Result;

use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::venv::SessionEnv;

/// Serves the documentation on a local web server with live rebuild.
///
/// Blocks until sphinx-autobuild is interrupted.
///
/// # Errors
///
/// Returns an error if an install fails or the builder exits with a
/// failure.
pub fn watch(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::WatchDocs, fresh)?;
    install_docs_requirements(&venv, layout)?;
    venv.install(&["sphinx-autobuild"])?;
    venv.install(&["-e", ".[dev]"])?;

    println!("📚 Watching documentation sources...");
    venv.run(
        "sphinx-autobuild",
        &[&path_arg(&layout.docs_dir()), &path_arg(&layout.docs_output_dir())],
    )
}

/// Builds the static HTML documentation into `build/docs`.
///
/// # Errors
///
/// Returns an error if an install fails or the builder exits with a
/// failure.
pub fn build(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::BuildDocs, fresh)?;
    build_html(&venv, layout)
}

/// Validates the external links of the documentation.
///
/// # Errors
///
/// Returns an error if an install fails or sphinx reports broken links.
pub fn linkcheck(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let venv = SessionEnv::prepare(layout, Session::LinkcheckDocs, fresh)?;
    install_docs_requirements(&venv, layout)?;
    venv.install(&["-e", ".[dev]"])?;

    println!("🔗 Checking documentation links...");
    venv.run(
        "sphinx-build",
        &["-b", "linkcheck", &path_arg(&layout.docs_dir()), &path_arg(&layout.linkcheck_dir())],
    )
}

/// Installs the documentation toolchain and the project, then runs the
/// HTML builder. The docset and archive sessions reuse this body in
/// their own environments.
pub fn build_html(venv: &SessionEnv, layout: &ProjectLayout) -> Result<()> {
    install_docs_requirements(venv, layout)?;
    venv.install(&["-e", ".[dev]"])?;

    println!("📚 Building HTML documentation...");
    venv.run(
        "sphinx-build",
        &["-b", "html", &path_arg(&layout.docs_dir()), &path_arg(&layout.docs_output_dir())],
    )
}

/// Installs the pinned documentation toolchain from `docs/requirements.txt`.
pub(crate) fn install_docs_requirements(venv: &SessionEnv, layout: &ProjectLayout) -> Result<()> {
    let requirements = layout.docs_dir().join("requirements.txt");
    venv.install(&["-r", &path_arg(&requirements)])
}
