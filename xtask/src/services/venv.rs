use std::env;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result, bail};
use fxhash::FxHashMap;
use tracing::debug;

use crate::models::layout::ProjectLayout;
use crate::models::session::Session;

// --- Backend ---

/// Backend used to create and populate session environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvBackend {
    /// The `uv` tool, preferred when found on `PATH`.
    Uv,
    /// The standard library `venv` module with pip.
    Venv,
}

impl VenvBackend {
    /// Probes for `uv`, falling back to the standard `venv` module.
    #[must_use]
    pub fn detect() -> Self {
        if is_tool_installed("uv") { Self::Uv } else { Self::Venv }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Uv => "uv",
            Self::Venv => "venv",
        }
    }
}

fn is_tool_installed(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

const fn python_interpreter() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

// --- Session environments ---

/// Extra settings for a tool invocation.
#[derive(Debug, Default)]
pub struct RunOptions<'a> {
    /// Working directory of the child; the project root when `None`.
    pub cwd: Option<&'a Path>,
    /// Additional environment variables for the child.
    pub env: Option<&'a FxHashMap<String, String>>,
}

/// A per-session Python virtual environment under `build/venvs/<session>`.
///
/// Environments are reused across runs; `fresh` discards the previous one.
#[derive(Debug)]
pub struct SessionEnv {
    session: Session,
    project_root: PathBuf,
    venv_dir: PathBuf,
    backend: VenvBackend,
}

impl SessionEnv {
    /// Creates or reuses the virtual environment for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be created or a stale
    /// one cannot be removed.
    pub fn prepare(layout: &ProjectLayout, session: Session, fresh: bool) -> Result<Self> {
        let venv = Self {
            session,
            project_root: layout.root().to_path_buf(),
            venv_dir: layout.venvs_dir().join(session.to_string()),
            backend: VenvBackend::detect(),
        };

        if fresh && venv.venv_dir.exists() {
            debug!("removing session environment at {}", venv.venv_dir.display());
            fs::remove_dir_all(&venv.venv_dir).with_context(|| {
                format!("Failed to remove the session environment at {}", venv.venv_dir.display())
            })?;
        }

        if venv.is_provisioned() {
            println!("♻️  Reusing the virtual environment of session '{}'", venv.session);
            return Ok(venv);
        }

        venv.create()?;
        Ok(venv)
    }

    // A pyvenv.cfg marks a completed interpreter setup; a bare directory
    // left by an interrupted run does not count.
    fn is_provisioned(&self) -> bool {
        self.venv_dir.join("pyvenv.cfg").is_file()
    }

    fn create(&self) -> Result<()> {
        let parent = self.venv_dir.parent().context("Session environment path has no parent")?;
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        println!(
            "🐍 Creating a virtual environment for session '{}' ({})",
            self.session,
            self.backend.label()
        );
        let status = match self.backend {
            VenvBackend::Uv => Command::new("uv")
                .arg("venv")
                .arg(&self.venv_dir)
                .status()
                .context("Failed to execute uv. Is it installed and on your PATH?")?,
            VenvBackend::Venv => Command::new(python_interpreter())
                .args(["-m", "venv"])
                .arg(&self.venv_dir)
                .status()
                .context("Failed to execute the Python interpreter")?,
        };

        ensure_success(status, self.backend.label())
    }

    /// Directory holding the environment's executables.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        let bin = if cfg!(windows) { "Scripts" } else { "bin" };
        self.venv_dir.join(bin)
    }

    /// Path of the environment's Python interpreter.
    #[must_use]
    pub fn python(&self) -> PathBuf {
        let python = if cfg!(windows) { "python.exe" } else { "python" };
        self.bin_dir().join(python)
    }

    /// Installs packages into the environment.
    ///
    /// Runs from the project root so editable installs such as `-e .[dev]`
    /// resolve against the checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the installer exits with a non-zero status.
    pub fn install(&self, args: &[&str]) -> Result<()> {
        println!("📥 Installing into '{}': {}", self.session, args.join(" "));

        let mut command = match self.backend {
            VenvBackend::Uv => {
                let mut command = Command::new("uv");
                command.args(["pip", "install", "--python"]).arg(self.python());
                command
            },
            VenvBackend::Venv => {
                let mut command = Command::new(self.python());
                command.args(["-m", "pip", "install"]);
                command
            },
        };

        let status = command
            .args(args)
            .current_dir(&self.project_root)
            .status()
            .with_context(|| format!("Failed to run the {} installer", self.backend.label()))?;

        if !status.success() {
            bail!("Package installation failed with status: {status}");
        }
        Ok(())
    }

    /// Runs `program` from the environment with inherited stdio.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits with a
    /// non-zero status.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        self.run_with(program, args, &RunOptions::default())
    }

    /// Runs `program` with explicit working directory and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits with a
    /// non-zero status.
    pub fn run_with(&self, program: &str, args: &[&str], options: &RunOptions<'_>) -> Result<()> {
        let mut command = self.command(program);
        command.args(args).current_dir(options.cwd.unwrap_or(&self.project_root));
        if let Some(env) = options.env {
            command.envs(env);
        }

        debug!("running {program} {}", args.join(" "));
        let status = command.status().with_context(|| spawn_failure(program))?;

        ensure_success(status, program)
    }

    /// Runs `program` and captures its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits with a
    /// non-zero status; the error carries the program's stderr.
    pub fn run_captured(&self, program: &str, args: &[&str]) -> Result<String> {
        debug!("running {program} {} (captured)", args.join(" "));
        let output = self
            .command(program)
            .args(args)
            .current_dir(&self.project_root)
            .output()
            .with_context(|| spawn_failure(program))?;

        if !output.status.success() {
            bail!(
                "'{program}' failed with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs `program` with its standard output redirected into a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be created, the program
    /// cannot be spawned, or it exits with a non-zero status.
    pub fn run_redirected(&self, program: &str, args: &[&str], stdout_path: &Path) -> Result<()> {
        let log = File::create(stdout_path)
            .with_context(|| format!("Failed to create {}", stdout_path.display()))?;

        debug!("running {program} {} (stdout -> {})", args.join(" "), stdout_path.display());
        let status = self
            .command(program)
            .args(args)
            .current_dir(&self.project_root)
            .stdout(Stdio::from(log))
            .status()
            .with_context(|| spawn_failure(program))?;

        ensure_success(status, program)
    }

    // Children resolve tools from the environment first, like an
    // activated shell would.
    fn command(&self, program: &str) -> Command {
        let mut command = Command::new(self.tool_path(program));
        command.env("VIRTUAL_ENV", &self.venv_dir);
        command.env("PATH", prepend_path(&self.bin_dir()));
        command
    }

    fn tool_path(&self, program: &str) -> PathBuf {
        let candidate = self.bin_dir().join(format!("{program}{}", env::consts::EXE_SUFFIX));
        if candidate.is_file() { candidate } else { PathBuf::from(program) }
    }
}

fn ensure_success(status: ExitStatus, program: &str) -> Result<()> {
    if !status.success() {
        bail!("'{program}' failed with status: {status}");
    }
    Ok(())
}

fn spawn_failure(program: &str) -> String {
    format!("Failed to execute {program}. Is it installed in the session environment?")
}

fn prepend_path(bin_dir: &Path) -> OsString {
    env::var_os("PATH").map_or_else(
        || bin_dir.as_os_str().to_owned(),
        |path| {
            let mut paths = vec![bin_dir.to_path_buf()];
            paths.extend(env::split_paths(&path));
            env::join_paths(paths).unwrap_or(path)
        },
    )
}
