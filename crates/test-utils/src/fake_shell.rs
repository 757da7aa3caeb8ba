use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use wst::env::Environment;
use wst::errors::Result;
use wst::shell::{BoxFuture, Shell};

/// One recorded `call_build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub env: Environment,
}

/// Anything the fake shell was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCall {
    Build(Invocation),
    Makedirs(PathBuf),
    Rmtree(PathBuf),
}

/// A shell that never spawns processes or touches the filesystem.
///
/// - records every `call_build` and `rmtree`
/// - `call_build` succeeds unless the command line contains one of the
///   configured failure markers
#[derive(Debug, Clone, Default)]
pub struct RecordingShell {
    calls: Arc<Mutex<Vec<ShellCall>>>,
    fail_markers: Arc<Mutex<Vec<String>>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `call_build` whose argv contains `marker` report failure.
    pub fn fail_when(self, marker: &str) -> Self {
        self.fail_markers.lock().unwrap().push(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ShellCall::Build(inv) => Some(inv),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ShellCall::Rmtree(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl Shell for RecordingShell {
    fn call_build<'a>(
        &'a self,
        argv: &'a [String],
        cwd: &'a Path,
        env: &'a Environment,
    ) -> BoxFuture<'a, bool> {
        let calls = Arc::clone(&self.calls);
        let markers = Arc::clone(&self.fail_markers);

        Box::pin(async move {
            calls.lock().unwrap().push(ShellCall::Build(Invocation {
                argv: argv.to_vec(),
                cwd: cwd.to_path_buf(),
                env: env.clone(),
            }));

            let markers = markers.lock().unwrap().clone();
            !argv
                .iter()
                .any(|a| markers.iter().any(|m| a.contains(m.as_str())))
        })
    }

    fn makedirs<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls
                .lock()
                .unwrap()
                .push(ShellCall::Makedirs(path.to_path_buf()));
            Ok(())
        })
    }

    fn rmtree<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls
                .lock()
                .unwrap()
                .push(ShellCall::Rmtree(path.to_path_buf()));
            Ok(())
        })
    }
}
