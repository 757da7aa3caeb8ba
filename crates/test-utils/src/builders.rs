#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use wst::config::{ConfigFile, ProjectConfig, RawConfigFile, WorkspaceSection};
use wst::errors::Result;
use wst::types::BuildType;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
    root: Option<PathBuf>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                workspace: WorkspaceSection::default(),
                project: BTreeMap::new(),
            },
            root: None,
        }
    }

    pub fn with_project(mut self, name: &str, project: ProjectConfig) -> Self {
        self.config.project.insert(name.to_string(), project);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.config.workspace.prefix = prefix.into();
        self
    }

    pub fn with_build_root(mut self, build_root: impl Into<PathBuf>) -> Self {
        self.config.workspace.build_root = build_root.into();
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.config.workspace.build_type = build_type;
        self
    }

    /// Resolve relative paths against `root` instead of `.`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        let cfg = ConfigFile::try_from(self.config)?;
        Ok(match self.root {
            Some(root) => cfg.with_root(root),
            None => cfg,
        })
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectConfigBuilder {
    project: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new(builder: &str) -> Self {
        Self {
            project: ProjectConfig {
                path: None,
                builder: builder.to_string(),
                args: vec![],
                after: vec![],
            },
        }
    }

    pub fn setuptools() -> Self {
        Self::new("setuptools")
    }

    pub fn cmake() -> Self {
        Self::new("cmake")
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project.path = Some(path.into());
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.project.args.push(arg.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.project.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}
