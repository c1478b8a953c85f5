//! File system interface
//!
//! All paths are relative to the project root the implementation is bound
//! to. Every operation is fallible with [`Error::IoError`](crate::Error).

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Trait for the file system operations the migration needs
pub trait FileSystem: Send + Sync {
    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> Result<bool>;

    /// List every file below `dir`, recursively, in a stable order.
    /// Returns an empty list when `dir` does not exist.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Move a file or directory in a single file-system operation,
    /// creating the parent directories of `to` as needed
    fn move_path(&self, from: &Path, to: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a file so that it is complete on disk when this returns
    fn write_durable(&self, path: &Path, contents: &str) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove `dir` and its empty subdirectories. Returns false, leaving
    /// everything in place, when any file remains below it.
    fn remove_empty_dirs(&self, dir: &Path) -> Result<bool>;
}
