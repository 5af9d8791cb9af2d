use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::handlers::docs;
use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::git;
use crate::services::venv::SessionEnv;

/// Placeholder version recorded when the checkout has no release tags yet.
const INVALID_TAG: &str = "_INVALID_";
/// Directory of the development (unreleased) documentation build.
const DEV_DOCS_DIR: &str = "main";
/// Name of the stable pointer to the newest release documentation.
const LATEST_LINK: &str = "latest";

/// Builds the documentation for every release tag and refreshes the
/// `latest` pointer for the published site.
///
/// # Errors
///
/// Returns an error if an install fails, the builder exits with a
/// failure, or the site files cannot be assembled.
pub fn run(layout: &ProjectLayout, fresh: bool) -> Result<()> {
    let output_dir = layout.mv_docs_dir();
    let redirect = layout.contrib_dir().join("docs-redirect.html");

    let venv = SessionEnv::prepare(layout, Session::BuildDocsMultiversion, fresh)?;
    docs::install_docs_requirements(&venv, layout)?;
    venv.install(&["-e", ".[dev]"])?;

    // sphinx-multiversion cannot tell which tag is the newest release, so
    // ask git and pass the answer down explicitly.
    let tags = git::release_tags(layout.root())?;
    let latest_tag = tags.first().cloned();

    let args = builder_args(latest_tag.as_deref(), &layout.docs_dir(), &output_dir);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    println!("📚 Building multiversion documentation...");
    venv.run("sphinx-multiversion", &args)?;

    println!("Copying docs redirect...");
    fs::copy(&redirect, output_dir.join("index.html"))
        .with_context(|| format!("Failed to copy {}", redirect.display()))?;

    println!("Copying needed GitHub pages files...");
    let dev_docs = output_dir.join(DEV_DOCS_DIR);
    for file in ["CNAME", ".nojekyll"] {
        fs::copy(dev_docs.join(file), output_dir.join(file))
            .with_context(|| format!("Failed to copy {file} from the development docs"))?;
    }

    println!("Creating symlink to latest docs...");
    update_latest_link(&output_dir, latest_tag.as_deref())
}

/// Arguments of the multiversion builder. Without a release tag no
/// `smv_latest_version` override is passed.
fn builder_args(latest_tag: Option<&str>, docs_dir: &Path, output_dir: &Path) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(tag) = latest_tag {
        args.push("-D".to_owned());
        args.push(format!("smv_latest_version={tag}"));
    }
    args.push(path_arg(docs_dir));
    args.push(path_arg(output_dir));
    args
}

/// Points `latest` at the newest tag's build, falling back to the
/// development docs when that build is missing.
fn update_latest_link(output_dir: &Path, latest_tag: Option<&str>) -> Result<()> {
    let link = output_dir.join(LATEST_LINK);

    // Stale links must not survive a rebuild.
    if fs::symlink_metadata(&link).is_ok() {
        fs::remove_file(&link)
            .with_context(|| format!("Failed to remove the previous '{LATEST_LINK}' link"))?;
    }

    let tag = latest_tag.unwrap_or(INVALID_TAG);
    let target = if output_dir.join(tag).is_dir() {
        tag
    } else {
        warn!("Docs for {tag} did not seem to be built, using development docs instead");
        DEV_DOCS_DIR
    };

    symlink(target, &link)
        .with_context(|| format!("Failed to link '{LATEST_LINK}' to '{target}'"))
}

#[cfg(unix)]
fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &str, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::other("the latest-docs link requires a Unix host"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_release_is_passed_to_the_builder() {
        let args =
            builder_args(Some("v0.4.0"), Path::new("/src/docs"), Path::new("/src/build/mv-docs"));

        assert_eq!(args[..2], ["-D", "smv_latest_version=v0.4.0"]);
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn no_tags_means_no_version_override() {
        let args = builder_args(None, Path::new("/src/docs"), Path::new("/src/build/mv-docs"));

        assert_eq!(args, ["/src/docs", "/src/build/mv-docs"]);
        assert!(!args.iter().any(|arg| arg.contains(INVALID_TAG)));
    }
}
