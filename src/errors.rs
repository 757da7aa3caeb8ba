// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WstError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Cycle detected in project graph: {0}")]
    DagCycle(String),

    #[error("Unknown builder '{name}' (known builders: {known})")]
    UnknownBuilder { name: String, known: String },

    /// The caller asked a backend for something it structurally cannot do,
    /// e.g. named build targets against a tool without a notion of targets.
    #[error("{0}")]
    Unsupported(String),

    #[error("{step} failed for project '{project}'")]
    BuildFailed { project: String, step: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WstError>;
