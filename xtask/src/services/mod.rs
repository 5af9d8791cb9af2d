pub mod archive;
pub mod git;
pub mod project;
pub mod venv;
