use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error type a visitor hook may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The visitor hook that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Enter,
    Import,
    Visit,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Enter => "enter",
            Hook::Import => "import",
            Hook::Visit => "visit",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry {}: {source}", path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Visitor {hook} hook failed in {}: {source}", path.display())]
    Hook {
        hook: Hook,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl ScanError {
    /// Path of the document being processed when the error was raised.
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::Load { path, .. }
            | ScanError::Entry { path, .. }
            | ScanError::Hook { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
