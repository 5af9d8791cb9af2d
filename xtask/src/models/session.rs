use strum_macros::{Display, EnumIter, EnumMessage};

/// The automation sessions the runner knows how to execute.
///
/// Kebab-cased session names double as the subcommand names and as the
/// directory names of the per-session virtual environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumMessage)]
#[strum(serialize_all = "kebab-case")]
pub enum Session {
    #[strum(message = "Run the unit test suite")]
    Test,
    #[strum(message = "Serve the documentation with live rebuild")]
    WatchDocs,
    #[strum(message = "Build the HTML documentation")]
    BuildDocs,
    #[strum(message = "Build documentation for every release tag")]
    BuildDocsMultiversion,
    #[strum(message = "Build a Dash/Zeal docset from the HTML documentation")]
    BuildDocset,
    #[strum(message = "Build and archive the HTML documentation")]
    DistDocs,
    #[strum(message = "Validate external links in the documentation")]
    LinkcheckDocs,
    #[strum(message = "Type check the package with mypy")]
    TypecheckMypy,
    #[strum(message = "Type check the package with pyright")]
    TypecheckPyright,
    #[strum(message = "Lint the source tree with flake8")]
    Lint,
    #[strum(message = "Build source and wheel distributions")]
    Dist,
}

/// Sessions executed when the runner is invoked without a subcommand.
pub const DEFAULT_SESSIONS: &[Session] =
    &[Session::Test, Session::Lint, Session::TypecheckMypy];

impl Session {
    /// Whether the session belongs to the default set.
    #[must_use]
    pub fn is_default(self) -> bool {
        DEFAULT_SESSIONS.contains(&self)
    }
}
