//! Read-only access to the caller's match history store.
//!
//! Historical corpora are kept as JSONL files, one match record per line.
//! Nothing here writes: the corpus is owned by whoever produced the file.

mod jsonl;

use std::path::PathBuf;
use thiserror::Error;

pub use jsonl::*;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}
