use std::env;
use std::path::PathBuf;

/// Set by GitHub Actions; its presence marks a CI run.
pub const CI_ENV: &str = "GITHUB_WORKSPACE";
/// Opt-in flag enabling coverage instrumentation outside of CI.
pub const COVERAGE_ENV: &str = "LODESTAR_TEST_COVERAGE";
/// Points the test session at a local Silica framework checkout.
pub const LOCAL_SILICA_ENV: &str = "LOCAL_SILICA_DIR";

/// The environment variables the runner consumes, captured once per
/// invocation so every session sees the same values.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub in_ci: bool,
    pub coverage_requested: bool,
    pub local_silica_dir: Option<PathBuf>,
}

impl EnvSnapshot {
    /// Captures the relevant variables from the process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            in_ci: env::var_os(CI_ENV).is_some(),
            coverage_requested: env::var_os(COVERAGE_ENV).is_some(),
            local_silica_dir: env::var_os(LOCAL_SILICA_ENV).map(PathBuf::from),
        }
    }

    /// Coverage is collected on every CI run and on explicit request.
    #[must_use]
    pub const fn coverage_enabled(&self) -> bool {
        self.in_ci || self.coverage_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_follows_ci() {
        let env = EnvSnapshot { in_ci: true, ..EnvSnapshot::default() };
        assert!(env.coverage_enabled());
    }

    #[test]
    fn coverage_follows_explicit_request() {
        let env = EnvSnapshot { coverage_requested: true, ..EnvSnapshot::default() };
        assert!(env.coverage_enabled());
    }

    #[test]
    fn coverage_is_off_by_default() {
        assert!(!EnvSnapshot::default().coverage_enabled());
    }
}
