// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::builder::BUILTIN_BUILDERS;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WstError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WstError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.workspace, raw.project))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_projects(cfg)?;
    validate_project_names(cfg)?;
    validate_builders(cfg)?;
    validate_project_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_projects(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.is_empty() {
        return Err(WstError::ConfigError(
            "config must contain at least one [project.<name>] section".to_string(),
        ));
    }
    Ok(())
}

// Project names double as build directory names.
fn validate_project_names(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.project.keys() {
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\']);
        if bad {
            return Err(WstError::ConfigError(format!(
                "invalid project name '{}': must be a plain directory name",
                name
            )));
        }
    }
    Ok(())
}

fn validate_builders(cfg: &RawConfigFile) -> Result<()> {
    for (name, project) in cfg.project.iter() {
        if !BUILTIN_BUILDERS.contains(&project.builder.as_str()) {
            return Err(WstError::ConfigError(format!(
                "project '{}' uses unknown builder '{}' (known builders: {})",
                name,
                project.builder,
                BUILTIN_BUILDERS.join(", ")
            )));
        }
    }
    Ok(())
}

fn validate_project_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, project) in cfg.project.iter() {
        for dep in project.after.iter() {
            if dep == name {
                return Err(WstError::ConfigError(format!(
                    "project '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.project.contains_key(dep) {
                return Err(WstError::ConfigError(format!(
                    "project '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> project
    // For:
    //   [project.B]
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.project.keys() {
        graph.add_node(name.as_str());
    }

    for (name, project) in cfg.project.iter() {
        for dep in project.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(WstError::DagCycle(format!(
                "cycle detected in project graph involving project '{}'",
                node
            )))
        }
    }
}
