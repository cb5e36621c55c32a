//! Virtual file system used by the loaders.
//!
//! Paths are `/`-separated strings relative to a data root, never OS paths.
//! [`NativeFileSystem`] maps them under a directory on disk and
//! [`MemoryFileSystem`] keeps everything in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("'{path}' is a directory")]
    IsDirectory { path: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub trait FileSystem {
    fn exists(&self, path: &str) -> bool;
    fn is_directory(&self, path: &str) -> bool;
    fn read_to_string(&self, path: &str) -> Result<String, FileSystemError>;
}

/// Directory part of `path` including the trailing `/`, or `./` when there is none.
pub fn dirname(path: &str) -> String {
    match path.rfind('/') {
        Some(index) => path[..=index].to_string(),
        None => "./".to_string(),
    }
}

/// Joins a [`dirname`] result with a relative name.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return name.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    root: PathBuf,
}

impl NativeFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in path.split('/').filter(|part| !part.is_empty() && *part != ".") {
            resolved.push(component);
        }
        resolved
    }
}

impl FileSystem for NativeFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn is_directory(&self, path: &str) -> bool {
        self.resolve(path).is_dir()
    }

    fn read_to_string(&self, path: &str) -> Result<String, FileSystemError> {
        let resolved = self.resolve(path);
        if resolved.is_dir() {
            return Err(FileSystemError::IsDirectory {
                path: path.to_string(),
            });
        }
        fs::read_to_string(&resolved).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FileSystemError::NotFound {
                    path: path.to_string(),
                }
            } else {
                FileSystemError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<String, String>,
    directories: BTreeSet<String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, registering every parent directory along the way.
    pub fn insert_file(&mut self, path: &str, contents: impl Into<String>) {
        let normalized = normalize(path);
        let mut parent = normalized.as_str();
        while let Some(index) = parent.rfind('/') {
            parent = &parent[..index];
            self.directories.insert(parent.to_string());
        }
        self.files.insert(normalized, contents.into());
    }

    pub fn insert_directory(&mut self, path: &str) {
        self.directories.insert(normalize(path));
    }

    pub fn with_file(mut self, path: &str, contents: impl Into<String>) -> Self {
        self.insert_file(path, contents);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        let normalized = normalize(path);
        self.files.contains_key(&normalized) || self.directories.contains(&normalized)
    }

    fn is_directory(&self, path: &str) -> bool {
        self.directories.contains(&normalize(path))
    }

    fn read_to_string(&self, path: &str) -> Result<String, FileSystemError> {
        let normalized = normalize(path);
        if let Some(contents) = self.files.get(&normalized) {
            return Ok(contents.clone());
        }
        if self.directories.contains(&normalized) {
            return Err(FileSystemError::IsDirectory {
                path: path.to_string(),
            });
        }
        Err(FileSystemError::NotFound {
            path: path.to_string(),
        })
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn dirname_keeps_trailing_slash() {
        assert_eq!(dirname("levels/world1/worldmap.stwm"), "levels/world1/");
        assert_eq!(dirname("worldmap.stwm"), "./");
        assert_eq!(join("levels/world1/", "a.stl"), "levels/world1/a.stl");
        assert_eq!(join("levels", "a.stl"), "levels/a.stl");
    }

    #[test]
    fn memory_fs_tracks_parent_directories() {
        let fs = MemoryFileSystem::new().with_file("levels/world1/a.stl", "x");
        assert!(fs.exists("levels/world1/a.stl"));
        assert!(fs.is_directory("levels/world1"));
        assert!(fs.is_directory("levels/world1/"));
        assert!(fs.exists("./levels/world1/a.stl"));
        assert!(matches!(
            fs.read_to_string("levels"),
            Err(FileSystemError::IsDirectory { .. })
        ));
        assert!(matches!(
            fs.read_to_string("missing.stl"),
            Err(FileSystemError::NotFound { .. })
        ));
    }

    #[test]
    fn native_fs_reads_under_root() {
        let temp = TempDir::new().expect("temp");
        fs::create_dir_all(temp.path().join("levels").join("sub")).expect("mkdir");
        fs::write(temp.path().join("levels").join("a.stl"), "hello").expect("write");
        let native = NativeFileSystem::new(temp.path());

        assert!(native.exists("levels/a.stl"));
        assert!(native.is_directory("levels/sub"));
        assert_eq!(native.read_to_string("levels/a.stl").expect("read"), "hello");
        assert!(matches!(
            native.read_to_string("levels/nope.stl"),
            Err(FileSystemError::NotFound { .. })
        ));
        assert!(matches!(
            native.read_to_string("levels/sub"),
            Err(FileSystemError::IsDirectory { .. })
        ));
    }
}
