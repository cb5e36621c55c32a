use std::sync::Arc;

use thiserror::Error;

use crate::document::{ReaderError, ReaderMapping};
use crate::geometry::Vec2;
use crate::tileset::Tileset;

/// Edge length of one tile in pixels.
pub const TILE_SIZE_PX: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

#[derive(Debug, Default, PartialEq)]
pub(crate) struct ObjectIdAllocator {
    next: u64,
}

impl ObjectIdAllocator {
    pub(crate) fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "north" | "up" => Some(Direction::North),
            "east" | "right" => Some(Direction::East),
            "south" | "down" => Some(Direction::South),
            "west" | "left" => Some(Direction::West),
            _ => None,
        }
    }
}

/// Directions from which a special tile reacts when entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionMask {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl DirectionMask {
    pub const ALL: DirectionMask = DirectionMask {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Parses `north-west` style lists. An empty list means every direction.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut mask = DirectionMask {
            north: false,
            east: false,
            south: false,
            west: false,
        };
        let mut any = false;
        for part in raw.split(['-', ' ', ',']).filter(|part| !part.is_empty()) {
            match Direction::parse(part)? {
                Direction::North => mask.north = true,
                Direction::East => mask.east = true,
                Direction::South => mask.south = true,
                Direction::West => mask.west = true,
            }
            any = true;
        }
        Some(if any { mask } else { Self::ALL })
    }

    pub fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }
}

impl Default for DirectionMask {
    fn default() -> Self {
        Self::ALL
    }
}

fn read_position(mapping: &ReaderMapping<'_>) -> Result<Vec2, ReaderError> {
    Ok(Vec2 {
        x: mapping.get_f32("x")?.unwrap_or(0.0),
        y: mapping.get_f32("y")?.unwrap_or(0.0),
    })
}

fn invalid_value(
    mapping: &ReaderMapping<'_>,
    key: &str,
    value: &str,
    expected: &'static str,
) -> ReaderError {
    ReaderError::InvalidValue {
        path: mapping.path().to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected,
        location: mapping.location(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileMapError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

/// Tile layer. Tile `(x, y)` covers pixels `[x*32, x*32+32)`; id 0 is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    name: Option<String>,
    solid: bool,
    width: u32,
    height: u32,
    z_pos: i32,
    tiles: Vec<u32>,
    tileset: Arc<Tileset>,
}

impl TileMap {
    pub fn new(
        tileset: Arc<Tileset>,
        width: u32,
        height: u32,
        tiles: Vec<u32>,
    ) -> Result<Self, TileMapError> {
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TileMapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            name: None,
            solid: false,
            width,
            height,
            z_pos: 0,
            tiles,
            tileset,
        })
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub(crate) fn from_mapping(
        tileset: Arc<Tileset>,
        mapping: &ReaderMapping<'_>,
    ) -> Result<Self, EntryError> {
        let width = mapping
            .get_u32("width")?
            .ok_or_else(|| missing(mapping, "width"))?;
        let height = mapping
            .get_u32("height")?
            .ok_or_else(|| missing(mapping, "height"))?;
        let tiles = mapping.get_u32_list("tiles")?.unwrap_or_default();
        let mut tilemap = TileMap::new(tileset, width, height, tiles)?;
        tilemap.name = mapping.get_string("name");
        tilemap.solid = mapping.get_bool("solid")?.unwrap_or(false);
        tilemap.z_pos = mapping.get_i32("z-pos")?.unwrap_or(0);
        Ok(tilemap)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_solid(&self) -> bool {
        self.solid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn z_pos(&self) -> i32 {
        self.z_pos
    }

    pub fn tileset(&self) -> &Arc<Tileset> {
        &self.tileset
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<u32> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Tile id under a pixel position, 0 outside the layer.
    pub fn tile_at_pixel(&self, x: f32, y: f32) -> u32 {
        if x < 0.0 || y < 0.0 {
            return 0;
        }
        let column = (x / TILE_SIZE_PX).floor() as u32;
        let row = (y / TILE_SIZE_PX).floor() as u32;
        self.tile_at(column, row).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub image: Option<String>,
    pub speed: f32,
    pub layer: i32,
}

impl Background {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        Ok(Self {
            image: mapping.get_string("image"),
            speed: mapping.get_f32("speed")?.unwrap_or(1.0),
            layer: mapping.get_i32("layer")?.unwrap_or(-100),
        })
    }
}

/// Level marker on the map. `title` and `target_time` come from the level
/// file itself and keep their defaults when it cannot be read.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTile {
    pub name: String,
    pub position: Vec2,
    pub basedir: String,
    pub sprite: Option<String>,
    pub extro_script: Option<String>,
    pub auto_play: bool,
    pub title: String,
    pub target_time: f32,
}

impl LevelTile {
    pub(crate) fn from_mapping(
        basedir: &str,
        mapping: &ReaderMapping<'_>,
    ) -> Result<Self, ReaderError> {
        Ok(Self {
            name: mapping.require_string("name")?,
            position: read_position(mapping)?,
            basedir: basedir.to_string(),
            sprite: mapping.get_string("sprite"),
            extro_script: mapping.get_string("extro-script"),
            auto_play: mapping.get_bool("auto-play")?.unwrap_or(false),
            title: String::new(),
            target_time: 0.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialTile {
    pub position: Vec2,
    pub map_message: Option<String>,
    pub passive_message: bool,
    pub script: Option<String>,
    pub invisible: bool,
    pub apply_to: DirectionMask,
}

impl SpecialTile {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        let apply_to = match mapping.get_string("apply-to-direction") {
            Some(raw) => DirectionMask::parse(&raw).ok_or_else(|| {
                invalid_value(mapping, "apply-to-direction", &raw, "directions like north-west")
            })?,
            None => DirectionMask::ALL,
        };
        Ok(Self {
            position: read_position(mapping)?,
            map_message: mapping.get_string("map-message"),
            passive_message: mapping.get_bool("passive-message")?.unwrap_or(false),
            script: mapping.get_string("script"),
            invisible: mapping.get_bool("invisible-tile")?.unwrap_or(false),
            apply_to,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteChange {
    pub position: Vec2,
    pub sprite: Option<String>,
    pub stay_action: Option<String>,
    pub initial_stay_action: bool,
    pub stay_group: Option<String>,
    pub change_on_touch: bool,
}

impl SpriteChange {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        Ok(Self {
            position: read_position(mapping)?,
            sprite: mapping.get_string("sprite"),
            stay_action: mapping.get_string("stay-action"),
            initial_stay_action: mapping.get_bool("initial-stay-action")?.unwrap_or(false),
            stay_group: mapping.get_string("stay-group"),
            change_on_touch: mapping.get_bool("change-on-touch")?.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Teleporter {
    pub position: Vec2,
    pub worldmap: Option<String>,
    pub spawnpoint: Option<String>,
    pub automatic: bool,
    pub message: Option<String>,
    pub sprite: Option<String>,
}

impl Teleporter {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        Ok(Self {
            position: read_position(mapping)?,
            worldmap: mapping.get_string("worldmap"),
            spawnpoint: mapping.get_string("spawnpoint"),
            automatic: mapping.get_bool("automatic")?.unwrap_or(false),
            message: mapping.get_string("message"),
            sprite: mapping.get_string("sprite"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    pub position: Vec2,
    pub sprite: String,
    pub layer: i32,
}

impl Decal {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        Ok(Self {
            position: read_position(mapping)?,
            sprite: mapping.require_string("sprite")?,
            layer: mapping.get_i32("layer")?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPoint {
    pub name: String,
    pub position: Vec2,
    pub auto_dir: Option<Direction>,
}

impl SpawnPoint {
    pub(crate) fn from_mapping(mapping: &ReaderMapping<'_>) -> Result<Self, ReaderError> {
        let auto_dir = match mapping.get_string("auto-dir") {
            Some(raw) => Some(Direction::parse(&raw).ok_or_else(|| {
                invalid_value(mapping, "auto-dir", &raw, "north, east, south or west")
            })?),
            None => None,
        };
        Ok(Self {
            name: mapping.require_string("name")?,
            position: read_position(mapping)?,
            auto_dir,
        })
    }
}

/// Everything the loader can place into a worldmap's object list.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    TileMap(TileMap),
    Background(Background),
    Level(LevelTile),
    SpecialTile(SpecialTile),
    SpriteChange(SpriteChange),
    Teleporter(Teleporter),
    Decal(Decal),
}

impl SceneObject {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneObject::TileMap(_) => "tilemap",
            SceneObject::Background(_) => "background",
            SceneObject::Level(_) => "level",
            SceneObject::SpecialTile(_) => "special-tile",
            SceneObject::SpriteChange(_) => "sprite-change",
            SceneObject::Teleporter(_) => "teleporter",
            SceneObject::Decal(_) => "decal",
        }
    }
}

/// Failure while constructing one sector entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error(transparent)]
    TileMap(#[from] TileMapError),
}

fn missing(mapping: &ReaderMapping<'_>, key: &str) -> ReaderError {
    ReaderError::MissingField {
        path: mapping.path().to_string(),
        key: key.to_string(),
        location: mapping.location(),
    }
}

#[cfg(test)]
mod tests {
    use crate::document::ReaderDocument;
    use crate::tileset::TilesetId;

    use super::*;

    fn tileset() -> Arc<Tileset> {
        Arc::new(Tileset {
            id: TilesetId(0),
            name: "images/worldmap.strf".to_string(),
        })
    }

    #[test]
    fn tilemap_checks_tile_count() {
        let err = TileMap::new(tileset(), 2, 2, vec![1, 2, 3]).expect_err("err");
        assert_eq!(
            err,
            TileMapError::TileCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn tilemap_pixel_lookup() {
        let map = TileMap::new(tileset(), 2, 2, vec![0, 5, 6, 0]).expect("tilemap");
        assert_eq!(map.tile_at_pixel(40.0, 10.0), 5);
        assert_eq!(map.tile_at_pixel(10.0, 40.0), 6);
        assert_eq!(map.tile_at_pixel(-1.0, 10.0), 0);
        assert_eq!(map.tile_at_pixel(100.0, 10.0), 0);
    }

    #[test]
    fn tilemap_from_mapping_reads_layer_fields() {
        let doc = ReaderDocument::parse(
            "map.xml",
            r#"<tilemap solid="true" width="2" height="1" z-pos="-10"><name>ground</name><tiles>3 4</tiles></tilemap>"#,
        )
        .expect("parse");
        let map = TileMap::from_mapping(tileset(), &doc.root().mapping()).expect("tilemap");
        assert!(map.is_solid());
        assert_eq!(map.z_pos(), -10);
        assert_eq!(map.name(), Some("ground"));
        assert_eq!(map.tile_at(1, 0), Some(4));
    }

    #[test]
    fn tilemap_requires_dimensions() {
        let doc = ReaderDocument::parse("map.xml", r#"<tilemap><tiles>1</tiles></tilemap>"#)
            .expect("parse");
        let err = TileMap::from_mapping(tileset(), &doc.root().mapping()).expect_err("err");
        assert!(matches!(
            err,
            EntryError::Reader(ReaderError::MissingField { .. })
        ));
    }

    #[test]
    fn direction_mask_parsing() {
        let mask = DirectionMask::parse("north-west").expect("mask");
        assert!(mask.allows(Direction::North));
        assert!(mask.allows(Direction::West));
        assert!(!mask.allows(Direction::South));
        assert_eq!(DirectionMask::parse(""), Some(DirectionMask::ALL));
        assert_eq!(DirectionMask::parse("sideways"), None);
    }

    #[test]
    fn spawn_point_reads_auto_dir() {
        let doc = ReaderDocument::parse(
            "sp.xml",
            r#"<worldmap-spawnpoint name="main" x="4" y="5" auto-dir="west"/>"#,
        )
        .expect("parse");
        let spawn = SpawnPoint::from_mapping(&doc.root().mapping()).expect("spawn");
        assert_eq!(spawn.name, "main");
        assert_eq!(spawn.position, Vec2::new(4.0, 5.0));
        assert_eq!(spawn.auto_dir, Some(Direction::West));
    }

    #[test]
    fn decal_requires_sprite() {
        let doc = ReaderDocument::parse("d.xml", r#"<decal x="1" y="2"/>"#).expect("parse");
        assert!(Decal::from_mapping(&doc.root().mapping()).is_err());
    }
}
