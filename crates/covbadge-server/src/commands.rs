//! CLI command definitions using clap

use crate::config::DEFAULT_CONFIG_FILE;
use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand};
use covbadge::Selection;
use std::path::PathBuf;

/// covbadge: coverage badges for Go cover profiles
#[derive(Parser, Debug)]
#[command(name = "covbadge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to run (defaults to serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the badge service
    Serve,

    /// Print the coverage of a local profile
    Percent(PercentArgs),

    /// Print the badge URL for a local profile
    BadgeUrl(BadgeUrlArgs),
}

/// Arguments for the percent command
#[derive(Args, Debug, Clone)]
pub struct PercentArgs {
    /// Cover profile to read
    pub file: PathBuf,

    /// Files that count: combined, first or single
    #[arg(short, long, default_value = "combined")]
    pub selection: Selection,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the badge-url command
#[derive(Args, Debug, Clone)]
pub struct BadgeUrlArgs {
    /// Cover profile to read
    pub file: PathBuf,

    /// Badge service base URL
    #[arg(long)]
    pub shield: String,

    /// Files that count: combined, first or single
    #[arg(short, long, default_value = "combined")]
    pub selection: Selection,
}
