use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_WORLDMAP_TILESET: &str = "images/worldmap.strf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilesetId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub id: TilesetId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilesetError {
    #[error("tileset identifier must not be empty")]
    EmptyName,
}

/// Where the loader takes its tileset from when a document names none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilesetSource {
    #[default]
    Builtin,
    Explicit(String),
}

impl TilesetSource {
    pub fn identifier(&self) -> &str {
        match self {
            TilesetSource::Builtin => BUILTIN_WORLDMAP_TILESET,
            TilesetSource::Explicit(name) => name,
        }
    }
}

pub trait TilesetRegistry {
    fn get_tileset(&mut self, name: &str) -> Result<Arc<Tileset>, TilesetError>;
}

/// Caches one handle per identifier; asking twice yields the same tileset.
#[derive(Debug, Default)]
pub struct TileManager {
    tilesets: Vec<Arc<Tileset>>,
    tileset_ids_by_name: HashMap<String, TilesetId>,
}

impl TileManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tileset_count(&self) -> usize {
        self.tilesets.len()
    }
}

impl TilesetRegistry for TileManager {
    fn get_tileset(&mut self, name: &str) -> Result<Arc<Tileset>, TilesetError> {
        if name.trim().is_empty() {
            return Err(TilesetError::EmptyName);
        }
        if let Some(id) = self.tileset_ids_by_name.get(name) {
            if let Some(tileset) = self.tilesets.get(id.0 as usize) {
                return Ok(Arc::clone(tileset));
            }
        }
        let id = TilesetId(self.tilesets.len() as u32);
        let tileset = Arc::new(Tileset {
            id,
            name: name.to_string(),
        });
        self.tilesets.push(Arc::clone(&tileset));
        self.tileset_ids_by_name.insert(name.to_string(), id);
        Ok(tileset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_resolves_to_same_handle() {
        let mut manager = TileManager::new();
        let first = manager.get_tileset("images/a.strf").expect("first");
        let again = manager.get_tileset("images/a.strf").expect("again");
        let other = manager.get_tileset("images/b.strf").expect("other");
        assert!(Arc::ptr_eq(&first, &again));
        assert_ne!(first.id, other.id);
        assert_eq!(manager.tileset_count(), 2);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut manager = TileManager::new();
        assert_eq!(
            manager.get_tileset("  ").expect_err("err"),
            TilesetError::EmptyName
        );
    }

    #[test]
    fn source_identifier_falls_back_to_builtin() {
        assert_eq!(TilesetSource::Builtin.identifier(), BUILTIN_WORLDMAP_TILESET);
        assert_eq!(
            TilesetSource::Explicit("images/custom.strf".to_string()).identifier(),
            "images/custom.strf"
        );
    }
}
