use std::time::Duration;

use crate::geometry::Vec2;

use super::level::LevelTiles;
use super::render::DrawingContext;
use super::timer::Countdown;
use super::{FrameStep, Lifecycle, TransientEffect};

pub const BROKEN_BRICK_LIFETIME: Duration = Duration::from_millis(200);
pub const BROKEN_BRICK_PIECE_SIZE: f32 = 16.0;

/// One flying fragment of a destroyed brick.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenBrick {
    tile_id: u32,
    position: Vec2,
    velocity: Vec2,
    /// Top-left corner of the 16x16 part of the tile image this fragment shows.
    fragment: Vec2,
    timer: Countdown,
}

impl BrokenBrick {
    pub fn new(tile_id: u32, position: Vec2, velocity: Vec2, fragment: Vec2) -> Self {
        Self {
            tile_id,
            position,
            velocity,
            fragment,
            timer: Countdown::started(BROKEN_BRICK_LIFETIME),
        }
    }

    pub fn tile_id(&self) -> u32 {
        self.tile_id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }
}

impl TransientEffect for BrokenBrick {
    fn step(&mut self, frame: FrameStep, _level: &dyn LevelTiles) -> Lifecycle {
        self.position.x += self.velocity.x * frame.ratio;
        self.position.y += self.velocity.y * frame.ratio;
        self.timer.tick(frame.elapsed);

        if self.timer.is_running() {
            Lifecycle::Active
        } else {
            Lifecycle::Expired
        }
    }

    fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        if self.tile_id == 0 {
            return;
        }
        let target = self.position - scroll;
        context.draw_tile_part(
            self.tile_id,
            self.fragment,
            Vec2::new(target.x.trunc(), target.y.trunc()),
            Vec2::new(BROKEN_BRICK_PIECE_SIZE, BROKEN_BRICK_PIECE_SIZE),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::transient::level::EmptyLevel;
    use crate::transient::render::{DrawCommand, DrawList};

    use super::*;

    fn piece() -> BrokenBrick {
        BrokenBrick::new(
            5,
            Vec2::new(32.0, 64.0),
            Vec2::new(-1.0, -4.0),
            Vec2::new(3.0, 7.0),
        )
    }

    #[test]
    fn moves_by_velocity_scaled_with_ratio() {
        let mut brick = piece();
        let frame = FrameStep::from_elapsed(Duration::from_millis(50));
        assert_eq!(brick.step(frame, &EmptyLevel), Lifecycle::Active);
        assert!((brick.position().x - 27.0).abs() < 1e-4);
        assert!((brick.position().y - 44.0).abs() < 1e-4);
        assert_eq!(brick.remaining(), Duration::from_millis(150));
    }

    #[test]
    fn expires_once_lifetime_is_used() {
        let mut brick = piece();
        let frame = FrameStep::from_elapsed(Duration::from_millis(100));
        assert_eq!(brick.step(frame, &EmptyLevel), Lifecycle::Active);
        assert_eq!(brick.step(frame, &EmptyLevel), Lifecycle::Expired);
    }

    #[test]
    fn draws_its_fragment_relative_to_scroll() {
        let brick = piece();
        let mut list = DrawList::new(640.0);
        brick.draw(&mut list, Vec2::new(10.0, 20.5));
        assert_eq!(
            list.commands(),
            [DrawCommand::TilePart {
                tile_id: 5,
                source: Vec2::new(3.0, 7.0),
                position: Vec2::new(22.0, 43.0),
                size: Vec2::new(16.0, 16.0),
            }]
        );
    }

    #[test]
    fn empty_tile_draws_nothing() {
        let brick = BrokenBrick::new(0, Vec2::default(), Vec2::default(), Vec2::default());
        let mut list = DrawList::new(640.0);
        brick.draw(&mut list, Vec2::default());
        assert!(list.commands().is_empty());
    }
}
