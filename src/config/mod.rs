// src/config/mod.rs

//! Workspace configuration loading and validation.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a config file from disk.
//! - [`validate`] checks builders, dependencies and acyclicity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ProjectConfig, RawConfigFile, WorkspaceSection};
