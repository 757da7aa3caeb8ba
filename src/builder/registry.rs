// src/builder/registry.rs

//! Name-keyed registry of builders.
//!
//! The `builder = "..."` field of each project is resolved against this
//! registry once, when the workspace is set up; nothing downstream branches
//! on backend names.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::{Builder, CmakeBuilder, SetuptoolsBuilder};
use crate::errors::{Result, WstError};
use crate::shell::Shell;

/// Names of the builders shipped with `wst`.
pub const BUILTIN_BUILDERS: &[&str] = &[CmakeBuilder::NAME, SetuptoolsBuilder::NAME];

#[derive(Debug, Default)]
pub struct BuilderRegistry {
    builders: BTreeMap<&'static str, Arc<dyn Builder>>,
}

impl BuilderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in builder, all sharing `shell`.
    pub fn with_defaults(shell: Arc<dyn Shell>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CmakeBuilder::new(Arc::clone(&shell))));
        registry.register(Arc::new(SetuptoolsBuilder::new(shell)));
        registry
    }

    /// Add a builder under its own name, replacing any previous one.
    pub fn register(&mut self, builder: Arc<dyn Builder>) {
        self.builders.insert(builder.name(), builder);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builders.keys().copied()
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Builder>> {
        self.builders
            .get(name)
            .cloned()
            .ok_or_else(|| WstError::UnknownBuilder {
                name: name.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })
    }
}
