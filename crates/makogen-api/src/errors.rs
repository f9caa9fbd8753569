use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing public members
#[derive(Error, Debug)]
pub enum ListerError {
    /// Failed to resolve, read or list a path
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// Syntax error in source code (only raised in strict mode)
    #[error("Syntax error in {0}:{1}:{2}: {3}")]
    SyntaxError(PathBuf, usize, usize, String),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),

    /// Parsing timeout
    #[error("Parsing {0} exceeded timeout")]
    Timeout(PathBuf),

    /// Generic parsing error
    #[error("Parse error in {0}: {1}")]
    ParseError(PathBuf, String),
}

impl ListerError {
    /// Path of the input the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            ListerError::Io(path, _)
            | ListerError::SyntaxError(path, ..)
            | ListerError::FileTooLarge(path, _)
            | ListerError::Timeout(path)
            | ListerError::ParseError(path, _) => path,
        }
    }
}

/// Result type for lister operations
pub type ListerResult<T> = Result<T, ListerError>;
