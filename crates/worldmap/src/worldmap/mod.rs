//! Worldmap scene and its document loader.

mod error;
mod objects;
mod parser;
mod world;

pub use error::{FatalLoadError, LoadError, LoadReport, LoadWarning};
pub use objects::{
    Background, Decal, Direction, DirectionMask, EntryError, LevelTile, ObjectId, SceneObject,
    SpawnPoint, SpecialTile, SpriteChange, Teleporter, TileMap, TileMapError, TILE_SIZE_PX,
};
pub use parser::{load_worldmap, LoadContext, LoaderConfig, WorldMapParser, MAIN_SPAWNPOINT};
pub use world::{Avatar, WorldMap, WorldObject};
