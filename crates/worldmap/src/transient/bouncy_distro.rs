use crate::geometry::Vec2;

use super::level::LevelTiles;
use super::render::DrawingContext;
use super::{FrameStep, Lifecycle, TransientEffect};

pub const DISTRO_START_VELOCITY: f32 = -2.0;
pub const DISTRO_GRAVITY: f32 = 0.1;
pub const DISTRO_SPRITE: &str = "distro";

/// Coin that pops out of a bonus block and vanishes at the top of its arc.
#[derive(Debug, Clone, PartialEq)]
pub struct BouncyDistro {
    position: Vec2,
    vy: f32,
}

impl BouncyDistro {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            vy: DISTRO_START_VELOCITY,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vy
    }
}

impl TransientEffect for BouncyDistro {
    fn step(&mut self, frame: FrameStep, _level: &dyn LevelTiles) -> Lifecycle {
        self.position.y += self.vy * frame.ratio;
        self.vy += DISTRO_GRAVITY * frame.ratio;

        if self.vy >= 0.0 {
            Lifecycle::Expired
        } else {
            Lifecycle::Active
        }
    }

    fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        context.draw_sprite(DISTRO_SPRITE, self.position - scroll);
    }
}
