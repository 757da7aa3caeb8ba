// src/builder/mod.rs

//! The builder contract.
//!
//! Every build backend (setuptools, CMake, ...) is adapted to the same four
//! lifecycle hooks so the workspace orchestrator never needs backend-specific
//! branching:
//!
//! - [`Builder::env`] merges whatever the backend needs into the shared
//!   [`Environment`] (search paths under the install prefix, mostly).
//! - [`Builder::configure`] performs one-time setup before building.
//! - [`Builder::build`] builds and installs into the prefix.
//! - [`Builder::clean`] removes build artifacts so the next build starts fresh.
//!
//! Backend tool failures are reported as `Ok(false)` so the caller decides
//! whether to continue or abort. `Err` is reserved for requests the backend
//! structurally cannot satisfy (see [`WstError::Unsupported`]) and for real
//! IO errors.
//!
//! [`WstError::Unsupported`]: crate::errors::WstError::Unsupported

pub mod cmake;
pub mod registry;
pub mod setuptools;

use std::fmt::Debug;

use crate::env::Environment;
use crate::errors::Result;
use crate::shell::BoxFuture;
use crate::types::{BuildTargets, BuildType, Project, ProjectPaths};

pub use cmake::CmakeBuilder;
pub use registry::{BUILTIN_BUILDERS, BuilderRegistry};
pub use setuptools::SetuptoolsBuilder;

/// Uniform lifecycle implemented by every build backend.
///
/// Hooks of the same project are never run concurrently; the orchestrator
/// awaits each one before starting the next.
pub trait Builder: Send + Sync + Debug {
    /// Registry key, as written in the `builder = "..."` config field.
    fn name(&self) -> &'static str;

    /// Merge this backend's variables for `project` into `env`.
    ///
    /// Must be idempotent, must not touch the filesystem and must not spawn
    /// processes.
    fn env(&self, project: &Project, paths: &ProjectPaths, env: &mut Environment);

    /// One-time setup before building. May create `paths.build_dir`.
    fn configure<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
        build_type: BuildType,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>>;

    /// Build and install into `paths.prefix`.
    ///
    /// Named `targets` the backend cannot honor are an error, never a silent
    /// fallback to the default targets.
    fn build<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
        targets: &'a BuildTargets,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>>;

    /// Remove build artifacts. A missing build directory is already clean.
    fn clean<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Render a path as a command-line argument.
pub(crate) fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
