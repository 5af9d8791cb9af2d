use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Lists release tags (`v*`) of the checkout, newest first.
///
/// Mirrors `git tag -l 'v*' --sort=-v:refname`, so the first entry is the
/// most recent release.
///
/// # Errors
///
/// Returns an error if git cannot be executed or exits unsuccessfully.
pub fn release_tags(repo: &Path) -> Result<Vec<String>> {
    debug!("listing release tags in {}", repo.display());
    let output = Command::new("git")
        .args(["tag", "-l", "v*", "--sort=-v:refname"])
        .current_dir(repo)
        .output()
        .context("Failed to execute git. Is it installed and on your PATH?")?;

    if !output.status.success() {
        bail!(
            "'git tag' failed with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(parse_tag_list(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.lines().map(str::trim).filter(|line| !line.is_empty()).map(ToOwned::to_owned).collect()
}
