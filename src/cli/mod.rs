//! CLI command definitions for todoport
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod convert;
pub mod info;

use clap::{Parser, Subcommand};
use convert::ConvertArgs;
use info::InfoArgs;

/// Convert To Do task exports into Super Productivity backups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an export file into an importable backup
    Convert(ConvertArgs),

    /// Inspect a backup file and print its entity counts
    Info(InfoArgs),
}
