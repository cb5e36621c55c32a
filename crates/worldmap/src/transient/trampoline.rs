use crate::geometry::Vec2;

use super::level::LevelTiles;
use super::physic::Physic;
use super::render::DrawingContext;
use super::{FrameStep, Lifecycle, TransientEffect};

pub const TRAMPOLINE_SIZE: f32 = 32.0;
pub const TRAMPOLINE_SPRITE: &str = "trampoline-1";

/// Persistent prop that falls until it rests on solid ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Trampoline {
    position: Vec2,
    size: Vec2,
    physic: Physic,
}

impl Trampoline {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(TRAMPOLINE_SIZE, TRAMPOLINE_SIZE),
            physic: Physic::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn physic(&self) -> &Physic {
        &self.physic
    }
}

impl TransientEffect for Trampoline {
    fn step(&mut self, frame: FrameStep, level: &dyn LevelTiles) -> Lifecycle {
        self.physic.apply(frame.ratio, &mut self.position);

        let bottom = self.position.y + self.size.y;
        if level.is_solid(self.position.x + self.size.x / 2.0, bottom) {
            self.position.y = (bottom / TRAMPOLINE_SIZE).trunc() * TRAMPOLINE_SIZE - self.size.y;
            self.physic.enable_gravity(false);
            self.physic.set_velocity_y(0.0);
        } else {
            self.physic.enable_gravity(true);
        }

        Lifecycle::Active
    }

    fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        let position = self.position - scroll;
        context.draw_sprite(
            TRAMPOLINE_SPRITE,
            Vec2::new(position.x.trunc(), position.y.trunc()),
        );
    }
}
