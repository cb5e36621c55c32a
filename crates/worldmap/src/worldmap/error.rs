use thiserror::Error;

use crate::document::{ReaderError, SourceLocation};
use crate::tileset::TilesetError;

/// Problems that abort a worldmap load.
#[derive(Debug, Error)]
pub enum FatalLoadError {
    #[error(transparent)]
    Document(#[from] ReaderError),
    #[error("file isn't a {expected} file (root element is <{found}>)")]
    ContentType {
        expected: &'static str,
        found: String,
    },
    #[error("no sector specified in worldmap file")]
    MissingSector,
    #[error("no solid tilemap specified")]
    NoSolidLayer,
    #[error("spawnpoint '{name}' not found")]
    MissingSpawnPoint { name: String },
    #[error("failed to resolve tileset '{name}': {source}")]
    Tileset {
        name: String,
        #[source]
        source: TilesetError,
    },
}

/// The single failure callers of the loader see.
#[derive(Debug, Error)]
#[error("problem when parsing worldmap '{filename}': {source}")]
pub struct LoadError {
    pub filename: String,
    #[source]
    pub source: FatalLoadError,
}

impl LoadError {
    pub fn kind(&self) -> &FatalLoadError {
        &self.source
    }
}

/// Problems that are logged and skipped; the load carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadWarning {
    #[error("unknown token '{key}' in worldmap at {location}")]
    UnknownEntry {
        key: String,
        location: SourceLocation,
    },
    #[error("skipping malformed '{key}' entry: {message}")]
    MalformedEntry { key: String, message: String },
    #[error("(ambient-light) requires a color as argument")]
    AmbientLightNeedsColor,
    #[error("multiple tilesets specified; ignoring '{name}'")]
    DuplicateTileset { name: String },
    #[error("level file '{path}' does not exist; skipping")]
    LevelFileMissing { path: String },
    #[error("level file '{path}' is a directory; skipping")]
    LevelFileIsDirectory { path: String },
    #[error("problem when reading level information from '{path}': {message}")]
    LevelInfoUnreadable { path: String, message: String },
}

/// Warnings collected during a successful load, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
