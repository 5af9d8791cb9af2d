use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::layout::ProjectLayout;

#[derive(Debug, Deserialize)]
struct PyProject {
    project: ProjectTable,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: String,
}

/// Identity of the host Python package, read from `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct ProjectMetadata {
    /// Import name, e.g. `lodestar`.
    pub package: String,
    /// Title-cased name used for the docset, e.g. `Lodestar`.
    pub display_name: String,
}

/// Reads the `[project]` table of the checkout's `pyproject.toml`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or carries no
/// `[project] name`.
pub fn read_project_metadata(layout: &ProjectLayout) -> Result<ProjectMetadata> {
    let path = layout.pyproject();
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: PyProject = toml::from_str(&content)
        .with_context(|| format!("Malformed [project] table in {}", path.display()))?;

    // Distribution names may use dashes; the import package never does.
    let package = manifest.project.name.replace('-', "_");
    let display_name = title_case(&package);

    Ok(ProjectMetadata { package, display_name })
}

fn title_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
