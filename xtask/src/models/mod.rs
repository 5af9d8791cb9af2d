pub mod args;
pub mod config;
pub mod env;
pub mod layout;
pub mod session;
