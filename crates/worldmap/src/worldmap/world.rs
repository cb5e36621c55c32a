use std::sync::Arc;

use tracing::debug;

use crate::geometry::{Color, Vec2};
use crate::tileset::Tileset;

use super::error::FatalLoadError;
use super::objects::{
    Direction, LevelTile, ObjectId, ObjectIdAllocator, SceneObject, SpawnPoint, SpecialTile,
    SpriteChange, Teleporter, TileMap,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Avatar {
    pub position: Vec2,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    pub object: SceneObject,
}

/// The overworld scene: owned objects plus the index collections the
/// runtime walks when the avatar moves.
///
/// Objects added through [`WorldMap::add_object`] stay pending until
/// [`WorldMap::update_game_objects`] moves them into the live list.
#[derive(Debug, Default, PartialEq)]
pub struct WorldMap {
    pub(crate) map_filename: String,
    pub(crate) levels_path: String,
    pub(crate) name: String,
    pub(crate) tileset: Option<Arc<Tileset>>,
    pub(crate) music: Option<String>,
    pub(crate) init_script: Option<String>,
    pub(crate) ambient_light: Color,
    allocator: ObjectIdAllocator,
    objects: Vec<WorldObject>,
    pending_objects: Vec<WorldObject>,
    pub(crate) spawn_points: Vec<SpawnPoint>,
    pub(crate) levels: Vec<ObjectId>,
    pub(crate) special_tiles: Vec<ObjectId>,
    pub(crate) sprite_changes: Vec<ObjectId>,
    pub(crate) teleporters: Vec<ObjectId>,
    avatar: Avatar,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = self.allocator.allocate();
        self.pending_objects.push(WorldObject { id, object });
        id
    }

    /// Moves pending objects into the live list, keeping insertion order.
    pub fn update_game_objects(&mut self) {
        if self.pending_objects.is_empty() {
            return;
        }
        debug!(
            pending = self.pending_objects.len(),
            live = self.objects.len(),
            "worldmap_objects_flushed"
        );
        self.objects.append(&mut self.pending_objects);
    }

    pub fn get_solid_tilemaps(&self) -> Vec<&TileMap> {
        self.objects
            .iter()
            .filter_map(|entry| match &entry.object {
                SceneObject::TileMap(tilemap) if tilemap.is_solid() => Some(tilemap),
                _ => None,
            })
            .collect()
    }

    pub fn move_to_spawnpoint(&mut self, name: &str) -> Result<(), FatalLoadError> {
        let spawn = self
            .spawn_point(name)
            .ok_or_else(|| FatalLoadError::MissingSpawnPoint {
                name: name.to_string(),
            })?;
        let (position, direction) = (spawn.position, spawn.auto_dir);
        self.avatar = Avatar {
            position,
            direction,
        };
        Ok(())
    }

    pub fn map_filename(&self) -> &str {
        &self.map_filename
    }

    pub fn levels_path(&self) -> &str {
        &self.levels_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tileset(&self) -> Option<&Arc<Tileset>> {
        self.tileset.as_ref()
    }

    pub fn set_tileset(&mut self, tileset: Arc<Tileset>) {
        self.tileset = Some(tileset);
    }

    pub fn music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    pub fn init_script(&self) -> Option<&str> {
        self.init_script.as_deref()
    }

    pub fn ambient_light(&self) -> Color {
        self.ambient_light
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects
            .iter()
            .chain(self.pending_objects.iter())
            .find(|entry| entry.id == id)
            .map(|entry| &entry.object)
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn spawn_point(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|spawn| spawn.name == name)
    }

    pub fn levels(&self) -> impl Iterator<Item = &LevelTile> + '_ {
        self.levels.iter().filter_map(|id| match self.find_object(*id) {
            Some(SceneObject::Level(level)) => Some(level),
            _ => None,
        })
    }

    pub fn special_tiles(&self) -> impl Iterator<Item = &SpecialTile> + '_ {
        self.special_tiles
            .iter()
            .filter_map(|id| match self.find_object(*id) {
                Some(SceneObject::SpecialTile(tile)) => Some(tile),
                _ => None,
            })
    }

    pub fn sprite_changes(&self) -> impl Iterator<Item = &SpriteChange> + '_ {
        self.sprite_changes
            .iter()
            .filter_map(|id| match self.find_object(*id) {
                Some(SceneObject::SpriteChange(change)) => Some(change),
                _ => None,
            })
    }

    pub fn teleporters(&self) -> impl Iterator<Item = &Teleporter> + '_ {
        self.teleporters
            .iter()
            .filter_map(|id| match self.find_object(*id) {
                Some(SceneObject::Teleporter(teleporter)) => Some(teleporter),
                _ => None,
            })
    }

    pub fn level_at(&self, position: Vec2) -> Option<&LevelTile> {
        self.levels().find(|level| level.position == position)
    }

    pub fn special_tile_at(&self, position: Vec2) -> Option<&SpecialTile> {
        self.special_tiles().find(|tile| tile.position == position)
    }

    pub fn sprite_change_at(&self, position: Vec2) -> Option<&SpriteChange> {
        self.sprite_changes()
            .find(|change| change.position == position)
    }

    pub fn teleporter_at(&self, position: Vec2) -> Option<&Teleporter> {
        self.teleporters()
            .find(|teleporter| teleporter.position == position)
    }
}
