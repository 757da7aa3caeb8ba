// src/builder/setuptools.rs

//! Python packages built and installed with `pip3`.
//!
//! setuptools has no configure step and no notion of named targets. Installing
//! into a non-standard `--prefix` only works when that prefix's site-packages
//! directory is on `PYTHONPATH`, which is what [`SetuptoolsBuilder::env`]
//! arranges.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, LazyLock};

use tracing::{debug, info, warn};

use crate::builder::{Builder, path_arg};
use crate::env::Environment;
use crate::errors::{Result, WstError};
use crate::shell::{BoxFuture, Shell};
use crate::types::{BuildTargets, BuildType, Project, ProjectPaths};

/// Overrides the detected site-packages subpath when set.
pub const SITE_PACKAGES_ENV: &str = "WST_PYTHON_SITE_PACKAGES";

/// Used when `python3` cannot be queried.
pub const FALLBACK_SITE_PACKAGES: &str = "lib/python3/site-packages";

const PURELIB_QUERY: &str =
    "import sysconfig; print(sysconfig.get_path('purelib', vars={'base': '', 'platbase': ''}))";

static SITE_PACKAGES_DIR: LazyLock<PathBuf> = LazyLock::new(detect_site_packages_dir);

/// Site-packages directory relative to an install prefix.
///
/// Computed on first use and cached for the rest of the process.
pub fn site_packages_dir() -> &'static Path {
    SITE_PACKAGES_DIR.as_path()
}

fn detect_site_packages_dir() -> PathBuf {
    if let Some(dir) = std::env::var(SITE_PACKAGES_ENV).ok().and_then(|d| relative_subpath(&d)) {
        debug!(dir = %dir, "site-packages taken from {}", SITE_PACKAGES_ENV);
        return PathBuf::from(dir);
    }

    let queried = Command::new("python3")
        .args(["-c", PURELIB_QUERY])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .and_then(|s| relative_subpath(&s));

    match queried {
        Some(dir) => {
            debug!(dir = %dir, "site-packages reported by python3");
            PathBuf::from(dir)
        }
        None => {
            warn!(
                fallback = FALLBACK_SITE_PACKAGES,
                "could not query python3 for its site-packages layout"
            );
            PathBuf::from(FALLBACK_SITE_PACKAGES)
        }
    }
}

// The subpath is joined onto a prefix, so it must never be absolute.
fn relative_subpath(raw: &str) -> Option<String> {
    let dir = raw.trim().trim_start_matches(['/', '\\']);
    (!dir.is_empty()).then(|| dir.to_string())
}

/// Builder for setuptools projects, driven through `pip3 install`.
#[derive(Debug, Clone)]
pub struct SetuptoolsBuilder {
    shell: Arc<dyn Shell>,
    site_packages: PathBuf,
}

impl SetuptoolsBuilder {
    pub const NAME: &'static str = "setuptools";

    /// Uses the process-wide site-packages layout (resolving it now if this
    /// is the first use).
    pub fn new(shell: Arc<dyn Shell>) -> Self {
        Self::with_site_packages(shell, site_packages_dir())
    }

    pub fn with_site_packages(shell: Arc<dyn Shell>, site_packages: impl Into<PathBuf>) -> Self {
        Self {
            shell,
            site_packages: site_packages.into(),
        }
    }

    /// Where modules installed under `prefix` end up.
    pub fn python_path(&self, prefix: &Path) -> PathBuf {
        prefix.join(&self.site_packages)
    }

    /// `pip3 install --prefix=... --build=... <args...> <source_dir>`
    pub fn install_command(&self, paths: &ProjectPaths, args: &[String]) -> Vec<String> {
        let mut cmd = vec![
            "pip3".to_string(),
            "install".to_string(),
            format!("--prefix={}", paths.prefix.display()),
            format!("--build={}", paths.build_dir.display()),
        ];
        cmd.extend(args.iter().cloned());
        cmd.push(path_arg(&paths.source_dir));
        cmd
    }
}

impl Builder for SetuptoolsBuilder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn env(&self, project: &Project, paths: &ProjectPaths, env: &mut Environment) {
        let python_path = path_arg(&self.python_path(&paths.prefix));
        debug!(project = %project.name, path = %python_path, "merging into PYTHONPATH");
        env.merge_var("PYTHONPATH", &[python_path]);
    }

    fn configure<'a>(
        &'a self,
        project: &'a Project,
        _paths: &'a ProjectPaths,
        _env: &'a Environment,
        _build_type: BuildType,
        _args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            debug!(project = %project.name, "setuptools has no configure step");
            Ok(true)
        })
    }

    fn build<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
        targets: &'a BuildTargets,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            if let BuildTargets::Named(_) = targets {
                return Err(WstError::Unsupported(format!(
                    "pip3 does not support alternate build targets but \"{}\" was specified for targets",
                    targets
                )));
            }

            let cmd = self.install_command(paths, args);
            info!(project = %project.name, "installing with pip3");
            Ok(self.shell.call_build(&cmd, &paths.source_dir, env).await)
        })
    }

    fn clean<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        _env: &'a Environment,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            // pip offers no incremental clean for an installed package; the
            // whole build tree goes.
            info!(project = %project.name, dir = %paths.build_dir.display(), "removing build directory");
            self.shell.rmtree(&paths.build_dir).await
        })
    }
}
