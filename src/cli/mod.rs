//! Command-line interface for path-monitor
//!
//! Argument parsing lives in [`commands`]; [`Output`] keeps the styling of
//! every command consistent.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
