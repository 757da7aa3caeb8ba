// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

use crate::types::BuildType;

/// Command-line arguments for `wst`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wst",
    version,
    about = "Build a workspace of projects with different build systems into one prefix.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the workspace config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path(), global = true)]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WST_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Configure, build and install projects (and their dependencies).
    Build(BuildArgs),
    /// Remove build artifacts of projects.
    Clean(CleanArgs),
    /// Print the variables the workspace adds to the environment.
    Env,
    /// Print projects in build order.
    List,
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Projects to build; all projects when omitted.
    #[arg(value_name = "PROJECT")]
    pub projects: Vec<String>,

    /// Build only these targets (repeatable). Not every builder supports it.
    #[arg(long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Overrides `[workspace].build_type`.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub build_type: Option<BuildType>,
}

#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Projects to clean; all projects when omitted.
    #[arg(value_name = "PROJECT")]
    pub projects: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
