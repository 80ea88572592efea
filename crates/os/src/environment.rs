use std::io;
use std::path::{Path, PathBuf};

use loader::{open_for_sequential_read, FileStream};

use crate::Config;

/// Platform services for the shell, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Environment {
    pub config: Config,
    root: PathBuf,
}

impl Environment {
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` against the root directory. Absolute paths are used as is.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Opens a program image for a single sequential read.
    pub fn open(&self, name: &str) -> io::Result<FileStream> {
        let path = self.resolve(name);
        tracing::debug!(path = %path.display(), "opening program");
        open_for_sequential_read(path)
    }
}
