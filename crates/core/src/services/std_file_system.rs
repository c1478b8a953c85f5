//! Default file system implementation
//!
//! Provides standard `std::fs` based access rooted at a project directory.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::interfaces::FileSystem;

/// Default implementation of FileSystem using std::fs
#[derive(Debug, Clone)]
pub struct StdFileSystem {
    root: PathBuf,
    ignored_dirs: Vec<String>,
}

impl StdFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored_dirs: vec!["node_modules".to_string()],
        }
    }

    /// Directory names that are never walked by `list_files`
    pub fn with_ignored_dirs(mut self, dirs: Vec<String>) -> Self {
        self.ignored_dirs = dirs;
        self
    }

    fn abs(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn rel(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        let abs = self.abs(path);
        abs.try_exists().map_err(|e| Error::io(path, e))
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        match fs::metadata(self.abs(path)) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let abs_dir = self.abs(dir);
        if !abs_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&abs_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !(e.file_type().is_dir() && self.ignored_dirs.iter().any(|d| *d == name))
            })
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| self.rel(p))
                    .unwrap_or_else(|| dir.to_path_buf());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("file system loop detected"));
                Error::io(path, source)
            })?;
            if entry.file_type().is_file() {
                files.push(self.rel(entry.path()));
            }
        }

        debug!("Listed {} files under {}", files.len(), dir.display());
        Ok(files)
    }

    fn move_path(&self, from: &Path, to: &Path) -> Result<()> {
        let abs_to = self.abs(to);
        if let Some(parent) = abs_to.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(to, e))?;
        }
        fs::rename(self.abs(from), &abs_to).map_err(|e| Error::io(from, e))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(self.abs(path)).map_err(|e| Error::io(path, e))
    }

    fn write_durable(&self, path: &Path, contents: &str) -> Result<()> {
        let abs = self.abs(path);
        let parent = abs
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent).map_err(|e| Error::io(path, e))?;

        let file_name = abs
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp = parent.join(format!(".{file_name}.specmigrate-tmp"));

        let write_tmp = || -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp);
            return Err(Error::io(path, e));
        }
        fs::rename(&tmp, &abs).map_err(|e| Error::io(path, e))?;

        // Persist the directory entry as well; not supported everywhere
        if let Err(e) = File::open(&parent).and_then(|d| d.sync_all()) {
            debug!("Could not sync directory {}: {}", parent.display(), e);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(self.abs(path)).map_err(|e| Error::io(path, e))
    }

    fn remove_empty_dirs(&self, dir: &Path) -> Result<bool> {
        remove_empty_tree(&self.abs(dir)).map_err(|e| Error::io(dir, e))
    }
}

fn remove_empty_tree(dir: &Path) -> io::Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }

    let mut empty = true;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            empty &= remove_empty_tree(&entry.path())?;
        } else {
            empty = false;
        }
    }

    if empty {
        fs::remove_dir(dir)?;
    }
    Ok(empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, StdFileSystem) {
        let temp_dir = TempDir::new().unwrap();
        let fs = StdFileSystem::new(temp_dir.path());
        (temp_dir, fs)
    }

    #[test]
    fn test_list_files_is_relative_and_sorted() {
        let (temp_dir, fs) = fixture();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("cypress/integration/nested")).unwrap();
        fs::create_dir_all(root.join("cypress/integration/node_modules/pkg")).unwrap();
        fs::write(root.join("cypress/integration/b.spec.js"), "").unwrap();
        fs::write(root.join("cypress/integration/a.spec.js"), "").unwrap();
        fs::write(root.join("cypress/integration/nested/c.spec.js"), "").unwrap();
        fs::write(root.join("cypress/integration/node_modules/pkg/x.js"), "").unwrap();

        let files = fs.list_files(Path::new("cypress/integration")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("cypress/integration/a.spec.js"),
                PathBuf::from("cypress/integration/b.spec.js"),
                PathBuf::from("cypress/integration/nested/c.spec.js"),
            ]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let (_temp_dir, fs) = fixture();
        assert!(fs.list_files(Path::new("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_move_creates_parents() {
        let (temp_dir, fs) = fixture();
        fs::write(temp_dir.path().join("a.js"), "x").unwrap();

        fs.move_path(Path::new("a.js"), Path::new("deep/er/a.js")).unwrap();
        assert!(temp_dir.path().join("deep/er/a.js").exists());
        assert!(!fs.exists(Path::new("a.js")).unwrap());
    }

    #[test]
    fn test_write_durable_leaves_no_temp_file() {
        let (temp_dir, fs) = fixture();
        fs.write_durable(Path::new("cypress.config.js"), "module.exports = {}\n")
            .unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["cypress.config.js".to_string()]);
        assert_eq!(
            fs.read_to_string(Path::new("cypress.config.js")).unwrap(),
            "module.exports = {}\n"
        );
    }

    #[test]
    fn test_remove_empty_dirs_keeps_files() {
        let (temp_dir, fs) = fixture();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("old/a/b")).unwrap();
        assert!(fs.remove_empty_dirs(Path::new("old")).unwrap());
        assert!(!root.join("old").exists());

        fs::create_dir_all(root.join("kept/a")).unwrap();
        fs::write(root.join("kept/a/file.js"), "").unwrap();
        assert!(!fs.remove_empty_dirs(Path::new("kept")).unwrap());
        assert!(root.join("kept/a/file.js").exists());
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let (_temp_dir, fs) = fixture();
        let err = fs.read_to_string(Path::new("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
