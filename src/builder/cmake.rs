// src/builder/cmake.rs

//! CMake projects: configure with `cmake -S/-B`, then `cmake --build` and
//! `cmake --install`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::builder::{Builder, path_arg};
use crate::env::Environment;
use crate::errors::Result;
use crate::shell::{BoxFuture, Shell};
use crate::types::{BuildTargets, BuildType, Project, ProjectPaths};

#[derive(Debug, Clone)]
pub struct CmakeBuilder {
    shell: Arc<dyn Shell>,
}

impl CmakeBuilder {
    pub const NAME: &'static str = "cmake";

    pub fn new(shell: Arc<dyn Shell>) -> Self {
        Self { shell }
    }

    /// Search-path contributions of an install prefix, as
    /// `(variable, entry)` pairs.
    pub fn search_paths(prefix: &Path) -> Vec<(&'static str, String)> {
        vec![
            ("PATH", path_arg(&prefix.join("bin"))),
            ("LD_LIBRARY_PATH", path_arg(&prefix.join("lib"))),
            ("PKG_CONFIG_PATH", path_arg(&prefix.join("lib").join("pkgconfig"))),
            ("CMAKE_PREFIX_PATH", path_arg(prefix)),
        ]
    }

    pub fn configure_command(
        paths: &ProjectPaths,
        build_type: BuildType,
        args: &[String],
    ) -> Vec<String> {
        let mut cmd = vec![
            "cmake".to_string(),
            "-S".to_string(),
            path_arg(&paths.source_dir),
            "-B".to_string(),
            path_arg(&paths.build_dir),
            format!("-DCMAKE_INSTALL_PREFIX={}", paths.prefix.display()),
            format!("-DCMAKE_BUILD_TYPE={}", build_type.cmake_name()),
        ];
        cmd.extend(args.iter().cloned());
        cmd
    }

    pub fn build_command(paths: &ProjectPaths, targets: &BuildTargets) -> Vec<String> {
        let mut cmd = vec![
            "cmake".to_string(),
            "--build".to_string(),
            path_arg(&paths.build_dir),
        ];
        if let BuildTargets::Named(names) = targets {
            for name in names {
                cmd.push("--target".to_string());
                cmd.push(name.clone());
            }
        }
        cmd
    }

    pub fn install_command(paths: &ProjectPaths) -> Vec<String> {
        vec![
            "cmake".to_string(),
            "--install".to_string(),
            path_arg(&paths.build_dir),
        ]
    }
}

impl Builder for CmakeBuilder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn env(&self, project: &Project, paths: &ProjectPaths, env: &mut Environment) {
        for (var, entry) in Self::search_paths(&paths.prefix) {
            debug!(project = %project.name, var, path = %entry, "merging search path");
            env.merge_var(var, &[entry]);
        }
    }

    fn configure<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
        build_type: BuildType,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            self.shell.makedirs(&paths.build_dir).await?;
            let cmd = Self::configure_command(paths, build_type, args);
            info!(project = %project.name, build_type = ?build_type, "configuring with cmake");
            Ok(self.shell.call_build(&cmd, &paths.build_dir, env).await)
        })
    }

    /// Extra arguments are configure-time cache definitions, so they are
    /// not repeated here.
    fn build<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        env: &'a Environment,
        targets: &'a BuildTargets,
        _args: &'a [String],
    ) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let cmd = Self::build_command(paths, targets);
            info!(project = %project.name, targets = %targets, "building with cmake");
            if !self.shell.call_build(&cmd, &paths.build_dir, env).await {
                return Ok(false);
            }

            // Only a full build is complete enough to install.
            if !targets.is_default() {
                return Ok(true);
            }

            let install = Self::install_command(paths);
            Ok(self.shell.call_build(&install, &paths.build_dir, env).await)
        })
    }

    fn clean<'a>(
        &'a self,
        project: &'a Project,
        paths: &'a ProjectPaths,
        _env: &'a Environment,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            info!(project = %project.name, dir = %paths.build_dir.display(), "removing build directory");
            self.shell.rmtree(&paths.build_dir).await
        })
    }
}
