// src/workspace.rs

//! Workspace orchestration.
//!
//! Walks the projects in dependency order and drives each one through the
//! builder lifecycle:
//!
//! ```text
//! Uninitialized -> EnvApplied -> Configured -> Built     (build)
//! Uninitialized -> EnvApplied -> Cleaned                 (clean)
//! ```
//!
//! Every project's `env` contribution is merged into the shared environment
//! before the first configure/build/clean step runs, so a project always sees
//! the search paths of everything installed into the prefix. Projects run one
//! at a time; the environment has a single mutator throughout.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::builder::{Builder, BuilderRegistry};
use crate::config::ConfigFile;
use crate::dag::ProjectGraph;
use crate::env::Environment;
use crate::errors::{Result, WstError};
use crate::types::{BuildTargets, BuildType, Project, ProjectPaths};

/// Where a project is in its lifecycle for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    EnvApplied,
    Configured,
    Built,
    Cleaned,
}

/// Final lifecycle state of each project touched by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub states: BTreeMap<String, LifecycleState>,
    /// Projects in the order their steps ran.
    pub order: Vec<String>,
}

impl RunReport {
    pub fn state_of(&self, project: &str) -> Option<LifecycleState> {
        self.states.get(project).copied()
    }
}

/// A project resolved against its builder and paths.
#[derive(Debug, Clone)]
struct Resolved {
    project: Project,
    paths: ProjectPaths,
    builder: Arc<dyn Builder>,
}

/// A loaded workspace, ready to run.
#[derive(Debug)]
pub struct Workspace {
    graph: ProjectGraph,
    order: Vec<String>,
    projects: BTreeMap<String, Resolved>,
    prefix: PathBuf,
    build_type: BuildType,
}

impl Workspace {
    /// Resolve every project's builder and compute the build order.
    ///
    /// Unknown builders fail here, before anything runs.
    pub fn new(config: &ConfigFile, registry: &BuilderRegistry) -> Result<Self> {
        let graph = ProjectGraph::from_config(config);
        let order = graph.build_order()?;
        let prefix = config.prefix();

        let mut projects = BTreeMap::new();
        for name in order.iter() {
            let project = config
                .resolve_project(name)
                .ok_or_else(|| WstError::ProjectNotFound(name.clone()))?;
            let builder = registry.get(&project.builder)?;
            let paths = ProjectPaths::for_project(&project, &prefix);
            projects.insert(
                name.clone(),
                Resolved {
                    project,
                    paths,
                    builder,
                },
            );
        }

        debug!(?order, prefix = %prefix.display(), "workspace resolved");

        Ok(Self {
            graph,
            order,
            projects,
            prefix,
            build_type: config.workspace.build_type,
        })
    }

    /// All projects, dependencies first.
    pub fn build_order(&self) -> &[String] {
        &self.order
    }

    pub fn prefix(&self) -> &PathBuf {
        &self.prefix
    }

    /// Build type from `[workspace]`, used when the caller does not pick one.
    pub fn default_build_type(&self) -> BuildType {
        self.build_type
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name).map(|r| &r.project)
    }

    /// Builder responsible for `name`.
    pub fn builder_of(&self, name: &str) -> Option<&Arc<dyn Builder>> {
        self.projects.get(name).map(|r| &r.builder)
    }

    /// Project names to operate on, in build order.
    ///
    /// An empty selection means every project. With `with_deps`, transitive
    /// dependencies of the selection are included.
    pub fn select(&self, names: &[String], with_deps: bool) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(self.order.clone());
        }

        let wanted = if with_deps {
            self.graph.with_dependencies(names)?
        } else {
            let mut set = BTreeSet::new();
            for name in names {
                if !self.graph.contains(name) {
                    return Err(WstError::ProjectNotFound(name.clone()));
                }
                set.insert(name.clone());
            }
            set
        };

        Ok(self
            .order
            .iter()
            .filter(|name| wanted.contains(*name))
            .cloned()
            .collect())
    }

    /// Merge every project's `env` contribution into `env`, in build order.
    pub fn apply_env(&self, env: &mut Environment) {
        for name in self.order.iter() {
            if let Some(r) = self.projects.get(name) {
                r.builder.env(&r.project, &r.paths, env);
            }
        }
    }

    /// Configure and build the selected projects (plus their dependencies).
    ///
    /// Stops at the first project whose configure or build step fails.
    pub async fn build(
        &self,
        selected: &[String],
        targets: &BuildTargets,
        build_type: BuildType,
        env: &mut Environment,
    ) -> Result<RunReport> {
        let names = self.select(selected, true)?;
        let mut report = self.start_report(&names, env);

        for name in names.iter() {
            let r = self.resolved(name)?;
            let args = &r.project.args;

            info!(project = %name, builder = r.builder.name(), "configuring");
            if !r.builder.configure(&r.project, &r.paths, env, build_type, args).await? {
                error!(project = %name, "configure step failed");
                return Err(WstError::BuildFailed {
                    project: name.clone(),
                    step: "configure".to_string(),
                });
            }
            report.states.insert(name.clone(), LifecycleState::Configured);

            info!(project = %name, builder = r.builder.name(), %targets, "building");
            if !r.builder.build(&r.project, &r.paths, env, targets, args).await? {
                error!(project = %name, "build step failed");
                return Err(WstError::BuildFailed {
                    project: name.clone(),
                    step: "build".to_string(),
                });
            }
            report.states.insert(name.clone(), LifecycleState::Built);
            report.order.push(name.clone());
        }

        info!(projects = names.len(), "build finished");
        Ok(report)
    }

    /// Clean the selected projects only; dependencies are left alone.
    pub async fn clean(&self, selected: &[String], env: &mut Environment) -> Result<RunReport> {
        let names = self.select(selected, false)?;
        let mut report = self.start_report(&names, env);

        for name in names.iter() {
            let r = self.resolved(name)?;
            info!(project = %name, builder = r.builder.name(), "cleaning");
            r.builder.clean(&r.project, &r.paths, env).await?;
            report.states.insert(name.clone(), LifecycleState::Cleaned);
            report.order.push(name.clone());
        }

        Ok(report)
    }

    fn start_report(&self, names: &[String], env: &mut Environment) -> RunReport {
        let mut report = RunReport::default();
        for name in names {
            report
                .states
                .insert(name.clone(), LifecycleState::Uninitialized);
        }

        self.apply_env(env);
        for state in report.states.values_mut() {
            *state = LifecycleState::EnvApplied;
        }
        report
    }

    fn resolved(&self, name: &str) -> Result<&Resolved> {
        self.projects
            .get(name)
            .ok_or_else(|| WstError::ProjectNotFound(name.to_string()))
    }
}
