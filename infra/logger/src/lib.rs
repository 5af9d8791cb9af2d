//! # Logger
//!
//! Console logging for the Lodestar developer tooling.
//!
//! The crate configures the global `tracing` subscriber with a compact
//! console layer and environment-based filtering:
//!
//! * The programmatic level set with [`LoggerBuilder::level`] acts as the
//!   default; a `RUST_LOG` value in the environment takes precedence.
//! * Use [`LoggerBuilder::env_filter`] for module-directed filters such as
//!   `"xtask=debug"` on top of the default level.
//!
//! ## Example
//!
//! ```rust
//! use lodestar_logger::{LevelFilter, Logger};
//!
//! let logger = Logger::builder()
//!     .name("lodestar-xtask")
//!     .level(LevelFilter::INFO)
//!     .init()
//!     .expect("logging can only be initialized once");
//!
//! tracing::info!("ready");
//! # assert_eq!(logger.name(), "lodestar-xtask");
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;

use std::borrow::Cow;

use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, registry};

use crate::private::Sealed;

// --- Configuration ---

/// Configuration shared by every builder state.
#[derive(Debug)]
pub struct LoggerConfig {
    level: LevelFilter,
    env_filter: Option<String>,
    ansi: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: LevelFilter::INFO, env_filter: None, ansi: true }
    }
}

// --- Builder states ---

mod private {
    pub trait Sealed {}
}

/// Marker for a builder without a name; only [`LoggerBuilder::name`] is
/// available in this state.
#[derive(Debug)]
pub struct NoName;

/// Marker for a builder that holds the mandatory logger name.
#[derive(Debug)]
pub struct WithName(String);

impl Sealed for NoName {}
impl Sealed for WithName {}

// --- Builder ---

/// A builder for configuring and initializing the global logging system.
///
/// The type state guarantees at compile time that [`LoggerBuilder::init`]
/// can only be called once a name has been provided.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the logger name, unlocking the remaining builder methods.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl LoggerBuilder<WithName> {
    /// Sets the default maximum level when `RUST_LOG` is not set.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds comma-separated filter directives, e.g. `"xtask=debug"`.
    #[must_use]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.config.env_filter = Some(directives.into());
        self
    }

    /// Enables or disables ANSI colors on the console output.
    #[must_use]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Initializes the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for an empty name or a
    /// malformed filter directive, and [`LoggerError::Subscriber`] if a
    /// global subscriber is already installed in this process.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        validate_name(&name)?;

        let filter = build_env_filter(&self.config)?;
        let console = fmt::layer().compact().with_target(false).with_ansi(self.config.ansi);

        registry().with(filter).with(console).try_init()?;

        debug!("logger '{name}' initialized");
        Ok(Logger { name })
    }
}

// --- Logger handle ---

/// A handle to the initialized logging system.
///
/// Dropping the handle does not tear the subscriber down; it exists as a
/// witness that initialization succeeded.
#[must_use = "the handle witnesses a successful logger initialization"]
#[derive(Debug)]
pub struct Logger {
    name: String,
}

impl Logger {
    /// Creates a new [`LoggerBuilder`] to configure the logging system.
    #[must_use]
    pub fn builder() -> LoggerBuilder<NoName> {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Returns the name the logger was initialized with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

// --- Helpers ---

fn validate_name(name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: Cow::Borrowed("logger name must not be empty"),
        });
    }
    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let mut filter =
        EnvFilter::builder().with_default_directive(config.level.into()).from_env_lossy();

    if let Some(directives) = &config.env_filter {
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let parsed = directive.parse().map_err(|_| LoggerError::InvalidConfiguration {
                message: Cow::Owned(format!("invalid filter directive '{directive}'")),
            })?;
            filter = filter.add_directive(parsed);
        }
    }

    Ok(filter)
}
