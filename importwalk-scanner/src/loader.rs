use crate::error::{Result, ScanError};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source of raw document markup.
pub trait Loader {
    fn load(&self, path: &Path) -> Result<String>;
}

/// Reads documents from the local filesystem as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl Loader for FsLoader {
    fn load(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| ScanError::Load {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Serves documents from memory, keyed by absolute path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, markup: impl Into<String>) -> Self {
        self.insert(path, markup);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, markup: impl Into<String>) {
        self.documents.insert(path.into(), markup.into());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }
}

impl Loader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| ScanError::Load {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such document"),
            })
    }
}

impl<L: Loader + ?Sized> Loader for &L {
    fn load(&self, path: &Path) -> Result<String> {
        (**self).load(path)
    }
}

/// Check whether a file exists on disk.
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}
