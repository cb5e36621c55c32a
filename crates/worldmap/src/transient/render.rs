use crate::geometry::Vec2;

/// Drawing surface effects render onto. Positions are screen pixels.
pub trait DrawingContext {
    fn screen_width(&self) -> f32;
    fn draw_sprite(&mut self, sprite: &str, position: Vec2);
    fn draw_tile(&mut self, tile_id: u32, position: Vec2);
    /// Draws the `size` sized part of a tile starting at `source` inside it.
    fn draw_tile_part(&mut self, tile_id: u32, source: Vec2, position: Vec2, size: Vec2);
    fn draw_text(&mut self, text: &str, position: Vec2);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        sprite: String,
        position: Vec2,
    },
    Tile {
        tile_id: u32,
        position: Vec2,
    },
    TilePart {
        tile_id: u32,
        source: Vec2,
        position: Vec2,
        size: Vec2,
    },
    Text {
        text: String,
        position: Vec2,
    },
}

/// Records draw calls instead of rasterizing them.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    screen_width: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(screen_width: f32) -> Self {
        Self {
            screen_width,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl DrawingContext for DrawList {
    fn screen_width(&self) -> f32 {
        self.screen_width
    }

    fn draw_sprite(&mut self, sprite: &str, position: Vec2) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.to_string(),
            position,
        });
    }

    fn draw_tile(&mut self, tile_id: u32, position: Vec2) {
        self.commands.push(DrawCommand::Tile { tile_id, position });
    }

    fn draw_tile_part(&mut self, tile_id: u32, source: Vec2, position: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::TilePart {
            tile_id,
            source,
            position,
            size,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
        });
    }
}
