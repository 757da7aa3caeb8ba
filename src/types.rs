use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Target name that is treated the same as "no targets requested".
pub const DEFAULT_TARGET: &str = "all";

/// Build flavour forwarded to a backend's configure step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BuildType {
    #[default]
    Debug,
    Release,
    RelWithDebInfo,
}

impl BuildType {
    /// Spelling used by CMake's `CMAKE_BUILD_TYPE`.
    pub fn cmake_name(self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "rel-with-deb-info" | "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            other => Err(format!(
                "invalid build_type: {other} (expected \"debug\", \"release\" or \"rel-with-deb-info\")"
            )),
        }
    }
}

/// Targets requested for a build.
///
/// - `Default`: let the backend build whatever it normally builds.
/// - `Named`: an explicit, ordered subset. Backends without a notion of
///   targets must reject this rather than quietly building the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildTargets {
    #[default]
    Default,
    Named(Vec<String>),
}

impl BuildTargets {
    pub fn is_default(&self) -> bool {
        matches!(self, BuildTargets::Default)
    }
}

impl From<Option<Vec<String>>> for BuildTargets {
    /// `None`, an empty list and `["all"]` all mean the default targets.
    fn from(targets: Option<Vec<String>>) -> Self {
        match targets {
            None => BuildTargets::Default,
            Some(t) if t.is_empty() => BuildTargets::Default,
            Some(t) if t.len() == 1 && t[0] == DEFAULT_TARGET => BuildTargets::Default,
            Some(t) => BuildTargets::Named(t),
        }
    }
}

impl From<Vec<String>> for BuildTargets {
    fn from(targets: Vec<String>) -> Self {
        BuildTargets::from(Some(targets))
    }
}

impl fmt::Display for BuildTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTargets::Default => f.write_str(DEFAULT_TARGET),
            BuildTargets::Named(t) => f.write_str(&t.join(" ")),
        }
    }
}

/// A named build unit, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// Registry key of the backend that builds this project.
    pub builder: String,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Extra arguments handed to the backend verbatim.
    pub args: Vec<String>,
    /// Projects that must be built (and whose `env` applied) first.
    pub after: Vec<String>,
}

/// Filesystem locations handed read-only into every lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub prefix: PathBuf,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(
        prefix: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
        }
    }

    /// Paths for `project` installing into the shared `prefix`.
    pub fn for_project(project: &Project, prefix: &Path) -> Self {
        Self::new(prefix, &project.source_dir, &project.build_dir)
    }
}
