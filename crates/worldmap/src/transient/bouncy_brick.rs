use crate::geometry::Vec2;

use super::level::LevelTiles;
use super::render::DrawingContext;
use super::{FrameStep, Lifecycle, TransientEffect};

pub const BOUNCY_BRICK_SPEED: f32 = 0.9;
pub const BOUNCY_BRICK_MAX_OFFSET: f32 = 8.0;

const TILE_EXTENT: f32 = 32.0;

/// A brick hit from below: it bumps up, falls back into place and is gone.
///
/// The offset stays within `[-BOUNCY_BRICK_MAX_OFFSET, 0]` and is exactly 0
/// on the step that ends the bounce.
#[derive(Debug, Clone, PartialEq)]
pub struct BouncyBrick {
    base: Vec2,
    offset: f32,
    offset_velocity: f32,
    raised: bool,
    shape: u32,
}

impl BouncyBrick {
    /// Captures the tile currently under `(x, y)` so it can be drawn displaced.
    pub fn new(x: f32, y: f32, level: &dyn LevelTiles) -> Self {
        Self {
            base: Vec2::new(x, y),
            offset: 0.0,
            offset_velocity: -BOUNCY_BRICK_SPEED,
            raised: false,
            shape: level.tile_id_at(x, y),
        }
    }

    pub fn base(&self) -> Vec2 {
        self.base
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn shape(&self) -> u32 {
        self.shape
    }
}

impl TransientEffect for BouncyBrick {
    fn step(&mut self, frame: FrameStep, _level: &dyn LevelTiles) -> Lifecycle {
        self.offset += self.offset_velocity * frame.ratio;

        if self.offset <= -BOUNCY_BRICK_MAX_OFFSET {
            self.offset = -BOUNCY_BRICK_MAX_OFFSET;
            self.offset_velocity = BOUNCY_BRICK_SPEED;
        }
        if self.offset < 0.0 {
            self.raised = true;
            return Lifecycle::Active;
        }

        self.offset = 0.0;
        if self.raised {
            Lifecycle::Expired
        } else {
            Lifecycle::Active
        }
    }

    fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        let visible = self.base.x >= scroll.x - TILE_EXTENT
            && self.base.x <= scroll.x + context.screen_width();
        if !visible {
            return;
        }
        let position = self.base - scroll;
        context.draw_tile(self.shape, Vec2::new(position.x, position.y + self.offset));
    }
}
