//! Test-only fakes for the runner's I/O seams.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::fs::SourceFs;
use crate::io::launch::{LaunchRequest, Launcher};
use crate::io::transpile::{TranspileRequest, Transpiler};

/// A filesystem operation observed by [`RecordingFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    Probe(PathBuf),
    Read(PathBuf),
}

/// In-memory [`SourceFs`] that records every probe and read.
#[derive(Debug, Default)]
pub struct RecordingFs {
    files: BTreeMap<PathBuf, String>,
    calls: RefCell<Vec<FsCall>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    pub fn calls(&self) -> Vec<FsCall> {
        self.calls.borrow().clone()
    }
}

impl SourceFs for RecordingFs {
    fn exists(&self, path: &Path) -> bool {
        self.calls
            .borrow_mut()
            .push(FsCall::Probe(path.to_path_buf()));
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.calls.borrow_mut().push(FsCall::Read(path.to_path_buf()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("read {}: not found", path.display()))
    }
}

/// [`Transpiler`] that records requests and returns a marked copy of the source.
#[derive(Debug, Default)]
pub struct RecordingTranspiler {
    failure: Option<String>,
    requests: RefCell<Vec<TranspileRequest>>,
}

impl RecordingTranspiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transpiler whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Code returned for `source`.
    pub fn output_for(source: &str) -> String {
        format!("/* transpiled */\n{source}")
    }

    pub fn requests(&self) -> Vec<TranspileRequest> {
        self.requests.borrow().clone()
    }
}

impl Transpiler for RecordingTranspiler {
    fn transpile(&self, request: &TranspileRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        match &self.failure {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(Self::output_for(&request.source)),
        }
    }
}

/// [`Launcher`] that returns scripted exit codes in order.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    codes: RefCell<VecDeque<i32>>,
    requests: RefCell<Vec<LaunchRequest>>,
}

impl RecordingLauncher {
    pub fn new(codes: Vec<i32>) -> Self {
        Self {
            codes: RefCell::new(codes.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<i32> {
        self.requests.borrow_mut().push(request.clone());
        self.codes
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted exit code left"))
    }
}

/// Scratch project directory for tests that touch the real filesystem.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write an executable shell script to `relative`.
    #[cfg(unix)]
    pub fn write_executable(&self, relative: &str, script: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write(relative, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("chmod {}", path.display()))?;
        Ok(path)
    }
}
