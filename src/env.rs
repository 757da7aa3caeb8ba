// src/env.rs

//! Process environment under construction for a build step.
//!
//! This module sits below the builder layer: builders and the workspace
//! orchestrator both depend on it, it depends on neither.
//!
//! Path-like variables (`PYTHONPATH`, `PATH`, `PKG_CONFIG_PATH`, ...) are
//! never overwritten. Whatever the caller already had is kept verbatim, empty
//! entries included (an empty entry means the current directory). New entries
//! are appended when absent. The ordering rules live in the pure [`merge`]
//! function so they can be tested without any IO.

use std::collections::BTreeMap;

/// Separator used inside path-like variables on this platform.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Merge `additions` into `existing`.
///
/// - `existing` is kept exactly as given, in its original order
/// - an addition is appended only if it is not present yet
/// - duplicate and empty additions are skipped
pub fn merge<S: AsRef<str>>(existing: &[String], additions: &[S]) -> Vec<String> {
    let mut merged = existing.to_vec();

    for entry in additions.iter().map(AsRef::as_ref) {
        if entry.is_empty() {
            continue;
        }
        if !merged.iter().any(|e| e == entry) {
            merged.push(entry.to_string());
        }
    }

    merged
}

/// Split a path-like value into its entries.
///
/// Empty entries are significant and kept. An empty value has no entries.
pub fn split_value(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(PATH_SEPARATOR).map(str::to_string).collect()
}

/// Join entries back into a single path-like value.
pub fn join_values(values: &[String]) -> String {
    values.join(&PATH_SEPARATOR.to_string())
}

/// Ordered mapping from variable name to value.
///
/// One `Environment` is shared by every project in a single `wst`
/// invocation; each builder's `env` hook mutates it through `&mut`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an environment from the calling process.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Variables whose value differs from (or is missing in) `base`.
    pub fn changed_from<'a>(
        &'a self,
        base: &'a Environment,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter(move |(k, v)| base.get(k) != Some(*v))
    }

    /// Entries of a path-like variable (empty if unset).
    pub fn path_entries(&self, name: &str) -> Vec<String> {
        self.get(name).map(split_value).unwrap_or_default()
    }

    /// Merge `values` into the path-like variable `name`.
    ///
    /// Safe to call any number of times with the same values: the variable
    /// converges after the first call.
    pub fn merge_var<S: AsRef<str>>(&mut self, name: &str, values: &[S]) {
        let merged = merge(&self.path_entries(name), values);
        if merged.is_empty() {
            return;
        }
        self.vars.insert(name.to_string(), join_values(&merged));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
