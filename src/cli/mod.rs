//! CLI module for redator - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
