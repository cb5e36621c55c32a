use crate::worldmap::{TileMap, WorldMap};

/// Tile queries effects make against the level they live in. Coordinates are pixels.
pub trait LevelTiles {
    fn tile_id_at(&self, x: f32, y: f32) -> u32;
    fn is_solid(&self, x: f32, y: f32) -> bool;
}

impl LevelTiles for TileMap {
    fn tile_id_at(&self, x: f32, y: f32) -> u32 {
        self.tile_at_pixel(x, y)
    }

    fn is_solid(&self, x: f32, y: f32) -> bool {
        self.is_solid() && self.tile_at_pixel(x, y) != 0
    }
}

/// Looks through the solid layers in object order; the first non-empty tile wins.
impl LevelTiles for WorldMap {
    fn tile_id_at(&self, x: f32, y: f32) -> u32 {
        self.get_solid_tilemaps()
            .into_iter()
            .map(|tilemap| tilemap.tile_at_pixel(x, y))
            .find(|tile| *tile != 0)
            .unwrap_or(0)
    }

    fn is_solid(&self, x: f32, y: f32) -> bool {
        self.get_solid_tilemaps()
            .into_iter()
            .any(|tilemap| LevelTiles::is_solid(tilemap, x, y))
    }
}

/// Level without any tiles, for effects stepped outside a scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLevel;

impl LevelTiles for EmptyLevel {
    fn tile_id_at(&self, _x: f32, _y: f32) -> u32 {
        0
    }

    fn is_solid(&self, _x: f32, _y: f32) -> bool {
        false
    }
}
