//! CLI module for cadre - command-line interface and subcommands.

pub mod commands;
pub mod console;

pub use commands::{Cli, Commands};
pub use console::ConsoleSink;
