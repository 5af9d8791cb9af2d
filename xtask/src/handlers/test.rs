use std::fs;

use anyhow::{Context, Result, bail};
use fxhash::FxHashMap;
use tracing::{info, warn};

use crate::models::config::TestConfig;
use crate::models::env::{EnvSnapshot, LOCAL_SILICA_ENV};
use crate::models::layout::{ProjectLayout, path_arg};
use crate::models::session::Session;
use crate::services::venv::{RunOptions, SessionEnv};

/// Git source of the Silica framework, installed when no local checkout
/// is configured.
const SILICA_GIT_SOURCE: &str = "git+https://github.com/silica-hdl/silica.git";

/// Where the Silica framework for the test environment comes from.
#[derive(Debug, PartialEq, Eq)]
enum FrameworkSource {
    /// Install from Git; `warn_fallback` marks a developer machine
    /// without a configured local checkout.
    PinnedGit { warn_fallback: bool },
    /// Editable install from a local checkout.
    LocalCheckout(String),
}

/// Runs the unit test suite, wrapped in coverage instrumentation when
/// enabled.
///
/// The suite runs from `build/tests` so test scratch files and coverage
/// data stay out of the source tree.
///
/// # Errors
///
/// Returns an error if the local framework override points nowhere, an
/// install fails, or the suite exits with a failure.
pub fn run(
    layout: &ProjectLayout,
    env: &EnvSnapshot,
    fresh: bool,
    posargs: &[String],
) -> Result<()> {
    let output_dir = layout.tests_output_dir();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut test_env = FxHashMap::default();
    if !env.in_ci {
        TestConfig::load(&layout.test_config_path())?.apply(&mut test_env);
    }

    // Resolve the framework source before touching the environment, so a
    // bad override aborts without leaving anything behind.
    let framework = framework_source(env)?;

    let venv = SessionEnv::prepare(layout, Session::Test, fresh)?;

    match &framework {
        FrameworkSource::PinnedGit { warn_fallback } => {
            if *warn_fallback {
                warn!("Lodestar depends on unreleased Silica features and bug fixes");
                warn!("`{LOCAL_SILICA_ENV}` is not set, falling back to the Git version");
            }
            venv.install(&[SILICA_GIT_SOURCE])?;
        },
        FrameworkSource::LocalCheckout(dir) => {
            venv.install(&["-e", dir])?;
        },
    }

    venv.install(&["-e", ".[dev]"])?;

    let rcfile = rcfile_arg(layout);
    let mut python_args: Vec<&str> = Vec::new();
    if env.coverage_enabled() {
        info!("Coverage support enabled");
        venv.install(&["coverage"])?;
        python_args.extend(["-m", "coverage", "run", "-p", &rcfile]);
        test_env.insert("COVERAGE_CORE".to_owned(), "sysmon".to_owned());
    }

    let root = path_arg(layout.root());
    python_args.extend(["-m", "unittest", "discover", "-s", &root]);
    python_args.extend(posargs.iter().map(String::as_str));

    let options = RunOptions { cwd: Some(&output_dir), env: Some(&test_env) };

    println!("🧪 Running core test suite...");
    venv.run_with("python", &python_args, &options)?;

    if env.coverage_enabled() {
        info!("Combining coverage data...");
        venv.run_with("python", &["-m", "coverage", "combine"], &options)?;

        info!("Generating XML coverage report...");
        venv.run_with("python", &["-m", "coverage", "xml", &rcfile], &options)?;
    }

    Ok(())
}

fn rcfile_arg(layout: &ProjectLayout) -> String {
    format!("--rcfile={}", layout.pyproject().display())
}

fn framework_source(env: &EnvSnapshot) -> Result<FrameworkSource> {
    // CI always tests against the pinned Git version; the local override
    // only applies on developer machines.
    let local = if env.in_ci { None } else { env.local_silica_dir.as_deref() };

    match local {
        None => {
            Ok(FrameworkSource::PinnedGit { warn_fallback: env.local_silica_dir.is_none() })
        },
        Some(dir) => {
            if !dir.exists() {
                bail!("Environment variable `{LOCAL_SILICA_ENV}` is set but does not exist!");
            }
            Ok(FrameworkSource::LocalCheckout(path_arg(dir)))
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn ci_always_uses_the_git_source() {
        let env = EnvSnapshot {
            in_ci: true,
            local_silica_dir: Some(PathBuf::from("/nonexistent/silica")),
            ..EnvSnapshot::default()
        };

        let source = framework_source(&env).expect("ci ignores the override");
        assert_eq!(source, FrameworkSource::PinnedGit { warn_fallback: false });
    }

    #[test]
    fn unset_override_falls_back_to_git_with_a_warning() {
        let source = framework_source(&EnvSnapshot::default()).expect("fallback");
        assert_eq!(source, FrameworkSource::PinnedGit { warn_fallback: true });
    }

    #[test]
    fn valid_override_installs_the_local_checkout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = EnvSnapshot {
            local_silica_dir: Some(dir.path().to_path_buf()),
            ..EnvSnapshot::default()
        };

        let source = framework_source(&env).expect("local checkout");
        assert_eq!(source, FrameworkSource::LocalCheckout(path_arg(dir.path())));
    }

    #[test]
    fn dangling_override_is_an_error() {
        let env = EnvSnapshot {
            local_silica_dir: Some(PathBuf::from("/nonexistent/silica")),
            ..EnvSnapshot::default()
        };

        let error = framework_source(&env).expect_err("missing checkout");
        assert!(error.to_string().contains(LOCAL_SILICA_ENV));
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn rcfile_points_at_the_checkout_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"lodestar\"\n")
            .expect("fixture pyproject");
        let layout = ProjectLayout::discover(Some(dir.path())).expect("valid checkout");

        let rcfile = rcfile_arg(&layout);
        assert!(rcfile.starts_with("--rcfile="));
        assert!(rcfile.ends_with("pyproject.toml"));
    }
}
