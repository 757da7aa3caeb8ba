// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (builders, dependencies, cycles). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// Relative paths in the returned config resolve against the directory that
/// holds the file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?.with_root(config_root_dir(path)?);
    debug!(
        config = %path.display(),
        root = %config.root.display(),
        projects = config.project.len(),
        "loaded workspace config"
    );
    Ok(config)
}

/// `Wst.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Wst.toml")
}

/// Absolute directory holding the config file.
///
/// Builders run tools with a project-specific working directory, so every
/// path derived from the root must already be absolute. A bare filename like
/// `Wst.toml` has an empty parent and resolves to the current directory.
pub fn config_root_dir(config_path: &Path) -> Result<PathBuf> {
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::path::absolute(parent)?,
        _ => std::env::current_dir()?,
    };
    Ok(root)
}
