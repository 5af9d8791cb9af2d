use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Resolved filesystem layout of the Lodestar checkout the sessions
/// operate on.
///
/// All build products live under `<root>/build`, which is disposable:
/// deleting it only costs the cached session environments.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Locates the project root and validates that it looks like a
    /// Lodestar checkout.
    ///
    /// Without an override the workspace is assumed to sit at the root of
    /// the checkout, beside `pyproject.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or carries no
    /// `pyproject.toml`.
    pub fn discover(root_override: Option<&Path>) -> Result<Self> {
        let root = match root_override {
            Some(path) => path.to_path_buf(),
            None => workspace_dir()?,
        };

        if !root.is_dir() {
            bail!("Project root does not exist: {}", root.display());
        }
        if !root.join("pyproject.toml").is_file() {
            bail!(
                "'{}' does not look like a Lodestar checkout (missing pyproject.toml)",
                root.display()
            );
        }

        let root = fs::canonicalize(&root)
            .with_context(|| format!("Failed to resolve {}", root.display()))?;

        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn pyproject(&self) -> PathBuf {
        self.root.join("pyproject.toml")
    }

    #[must_use]
    pub fn contrib_dir(&self) -> PathBuf {
        self.root.join("contrib")
    }

    #[must_use]
    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    #[must_use]
    pub fn dist_dir(&self) -> PathBuf {
        self.build_dir().join("dist")
    }

    /// Working directory of the test session; also holds the coverage data.
    #[must_use]
    pub fn tests_output_dir(&self) -> PathBuf {
        self.build_dir().join("tests")
    }

    #[must_use]
    pub fn test_config_path(&self) -> PathBuf {
        self.tests_output_dir().join("test_config.json")
    }

    #[must_use]
    pub fn docs_output_dir(&self) -> PathBuf {
        self.build_dir().join("docs")
    }

    #[must_use]
    pub fn mv_docs_dir(&self) -> PathBuf {
        self.build_dir().join("mv-docs")
    }

    #[must_use]
    pub fn linkcheck_dir(&self) -> PathBuf {
        self.build_dir().join("docs-linkcheck")
    }

    /// Report directory for one type checker, e.g. `build/typing/mypy`.
    #[must_use]
    pub fn typing_dir(&self, checker: &str) -> PathBuf {
        self.build_dir().join("typing").join(checker)
    }

    /// Parent directory of the per-session virtual environments.
    #[must_use]
    pub fn venvs_dir(&self) -> PathBuf {
        self.build_dir().join("venvs")
    }
}

fn workspace_dir() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("Could not derive the project root from the workspace location")
}

/// Renders a path as an argument for an external tool.
#[must_use]
pub fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
