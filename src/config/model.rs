// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{BuildType, Project};

/// Top-level configuration as read from a `Wst.toml` file.
///
/// ```toml
/// [workspace]
/// prefix = ".wst/install"
/// build_root = ".wst/build"
/// build_type = "debug"
///
/// [project.core]
/// builder = "cmake"
/// args = ["-DWITH_TESTS=OFF"]
///
/// [project.pytool]
/// path = "tools/py"
/// builder = "setuptools"
/// after = ["core"]
/// ```
///
/// This raw form is unvalidated; convert it into a [`ConfigFile`] with
/// `ConfigFile::try_from`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workspace: WorkspaceSection,

    /// All projects from `[project.<name>]`, keyed by project name.
    #[serde(default)]
    pub project: BTreeMap<String, ProjectConfig>,
}

/// A validated configuration.
///
/// Every `after` reference points at an existing project, every `builder`
/// is a known backend, and the dependency graph has no cycles.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub workspace: WorkspaceSection,
    pub project: BTreeMap<String, ProjectConfig>,
    /// Directory relative paths are resolved against (the directory holding
    /// the config file).
    pub root: PathBuf,
}

impl ConfigFile {
    /// Assemble a config without validating it. Used by `TryFrom` after
    /// validation has passed.
    pub(crate) fn new_unchecked(
        workspace: WorkspaceSection,
        project: BTreeMap<String, ProjectConfig>,
    ) -> Self {
        Self {
            workspace,
            project,
            root: PathBuf::from("."),
        }
    }

    /// Resolve relative paths against `root` from now on.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The shared staging prefix every project installs into.
    pub fn prefix(&self) -> PathBuf {
        self.root.join(&self.workspace.prefix)
    }

    pub fn build_root(&self) -> PathBuf {
        self.root.join(&self.workspace.build_root)
    }

    /// Resolve a configured project into a [`Project`] with root-relative
    /// source and build directories.
    pub fn resolve_project(&self, name: &str) -> Option<Project> {
        let pc = self.project.get(name)?;
        Some(Project {
            name: name.to_string(),
            builder: pc.builder.clone(),
            source_dir: self.root.join(pc.source_path(name)),
            build_dir: self.build_root().join(name),
            args: pc.args.clone(),
            after: pc.after.clone(),
        })
    }
}

/// `[workspace]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSection {
    /// Install prefix shared by all projects.
    #[serde(default = "default_prefix")]
    pub prefix: PathBuf,

    /// Each project builds in `<build_root>/<project name>`.
    #[serde(default = "default_build_root")]
    pub build_root: PathBuf,

    #[serde(default)]
    pub build_type: BuildType,
}

fn default_prefix() -> PathBuf {
    PathBuf::from(".wst/install")
}

fn default_build_root() -> PathBuf {
    PathBuf::from(".wst/build")
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            build_root: default_build_root(),
            build_type: BuildType::default(),
        }
    }
}

/// `[project.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Source directory; defaults to a directory named like the project.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Backend name, e.g. `"setuptools"` or `"cmake"`.
    pub builder: String,

    /// Extra arguments passed to the backend verbatim.
    #[serde(default)]
    pub args: Vec<String>,

    /// Projects that must be built before this one.
    #[serde(default)]
    pub after: Vec<String>,
}

impl ProjectConfig {
    pub fn source_path<'a>(&'a self, name: &'a str) -> &'a Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(name))
    }
}
