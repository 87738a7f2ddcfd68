//! Library half of the `eduhire` binary: configuration, argument
//! definitions and command handlers.

pub mod args;
pub mod commands;
pub mod config;

pub use args::Cli;
pub use config::{CliConfig, LogFormat};
