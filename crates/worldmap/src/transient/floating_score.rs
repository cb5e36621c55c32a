use std::time::Duration;

use crate::geometry::Vec2;

use super::level::LevelTiles;
use super::render::DrawingContext;
use super::timer::Countdown;
use super::{FrameStep, Lifecycle, TransientEffect};

pub const FLOATING_SCORE_LIFETIME: Duration = Duration::from_millis(1000);
pub const FLOATING_SCORE_DRIFT: f32 = 2.0;
pub const FLOATING_SCORE_RISE: f32 = 16.0;

const GLYPH_WIDTH: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingScore {
    position: Vec2,
    value: i32,
    timer: Countdown,
}

impl FloatingScore {
    pub fn new(x: f32, y: f32, value: i32) -> Self {
        Self {
            position: Vec2::new(x, y - FLOATING_SCORE_RISE),
            value,
            timer: Countdown::started(FLOATING_SCORE_LIFETIME),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl TransientEffect for FloatingScore {
    fn step(&mut self, frame: FrameStep, _level: &dyn LevelTiles) -> Lifecycle {
        self.position.y -= FLOATING_SCORE_DRIFT * frame.ratio;
        self.timer.tick(frame.elapsed);

        if self.timer.is_running() {
            Lifecycle::Active
        } else {
            Lifecycle::Expired
        }
    }

    /// Centers the digits over the 32 pixel wide spot the score was awarded at.
    fn draw(&self, context: &mut dyn DrawingContext, _scroll: Vec2) {
        let text = self.value.to_string();
        let x = self.position.x.trunc() + 16.0 - text.len() as f32 * GLYPH_WIDTH;
        context.draw_text(&text, Vec2::new(x, self.position.y.trunc()));
    }
}

#[cfg(test)]
mod tests {
    use crate::transient::level::EmptyLevel;
    use crate::transient::render::{DrawCommand, DrawList};

    use super::*;

    #[test]
    fn starts_above_and_drifts_up() {
        let mut score = FloatingScore::new(10.0, 100.0, 50);
        assert_eq!(score.position(), Vec2::new(10.0, 84.0));

        let frame = FrameStep::from_elapsed(Duration::from_millis(100));
        assert_eq!(score.step(frame, &EmptyLevel), Lifecycle::Active);
        assert!((score.position().y - 64.0).abs() < 1e-4);
    }

    #[test]
    fn lives_for_one_second() {
        let mut score = FloatingScore::new(0.0, 0.0, 10);
        let frame = FrameStep::from_elapsed(Duration::from_millis(250));
        for _ in 0..3 {
            assert_eq!(score.step(frame, &EmptyLevel), Lifecycle::Active);
        }
        assert_eq!(score.step(frame, &EmptyLevel), Lifecycle::Expired);
    }

    #[test]
    fn draws_value_as_text() {
        let score = FloatingScore::new(100.0, 50.0, 400);
        let mut list = DrawList::new(640.0);
        score.draw(&mut list, Vec2::default());
        assert_eq!(
            list.commands(),
            [DrawCommand::Text {
                text: "400".to_string(),
                position: Vec2::new(92.0, 34.0),
            }]
        );
    }
}
