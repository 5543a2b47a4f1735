//! Command-line interface.

pub mod args;
pub mod check;

pub use args::{CheckArgs, Cli, Commands, CompletionsArgs};
pub use check::CheckCommand;
