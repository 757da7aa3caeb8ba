// src/lib.rs

pub mod builder;
pub mod cli;
pub mod config;
pub mod dag;
pub mod env;
pub mod errors;
pub mod logging;
pub mod shell;
pub mod types;
pub mod workspace;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::builder::BuilderRegistry;
use crate::cli::{CliArgs, Command};
use crate::config::loader::load_and_validate;
use crate::env::Environment;
use crate::shell::{RealShell, Shell};
use crate::types::BuildTargets;
use crate::workspace::Workspace;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - the builder registry (resolved once, here)
/// - the workspace orchestrator
/// - an environment seeded from the calling process
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config;
    let cfg = load_and_validate(&config_path)?;

    let shell: Arc<dyn Shell> = Arc::new(RealShell::new());
    // Building the registry may query `python3` for its site-packages
    // layout; keep that blocking call off the async workers.
    let registry = tokio::task::spawn_blocking(move || BuilderRegistry::with_defaults(shell)).await?;
    let workspace = Workspace::new(&cfg, &registry)?;

    let mut env = Environment::from_process();
    info!(
        config = %config_path.display(),
        projects = workspace.build_order().len(),
        "workspace loaded"
    );

    match args.command {
        Command::Build(build) => {
            let targets = BuildTargets::from(build.targets);
            let build_type = build
                .build_type
                .unwrap_or_else(|| workspace.default_build_type());
            workspace
                .build(&build.projects, &targets, build_type, &mut env)
                .await?;
        }
        Command::Clean(clean) => {
            workspace.clean(&clean.projects, &mut env).await?;
        }
        Command::Env => {
            let base = env.clone();
            workspace.apply_env(&mut env);
            print_env(&env, &base);
        }
        Command::List => print_projects(&workspace),
    }

    Ok(())
}

/// Print variables added or changed by the workspace as `NAME=value` lines.
fn print_env(env: &Environment, base: &Environment) {
    for (name, value) in env.changed_from(base) {
        println!("{name}={value}");
    }
}

fn print_projects(workspace: &Workspace) {
    println!("prefix: {}", workspace.prefix().display());
    for name in workspace.build_order() {
        let Some(project) = workspace.project(name) else {
            continue;
        };
        println!("  - {name} ({})", project.builder);
        println!("      source: {}", project.source_dir.display());
        println!("      build: {}", project.build_dir.display());
        if !project.after.is_empty() {
            println!("      after: {:?}", project.after);
        }
        if !project.args.is_empty() {
            println!("      args: {:?}", project.args);
        }
    }
}
