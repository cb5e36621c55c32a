//! Short-lived effects spawned by gameplay events.
//!
//! Each effect advances once per frame and reports [`Lifecycle::Expired`]
//! when it is done; its owning [`EffectCollection`] then removes exactly that
//! effect. A pass steps each effect exactly once and drops the expired ones
//! in place, keeping survivors in spawn order.

mod bouncy_brick;
mod bouncy_distro;
mod broken_brick;
mod floating_score;
mod level;
mod physic;
mod render;
mod timer;
mod trampoline;

use std::time::Duration;

use tracing::debug;

use crate::geometry::Vec2;

pub use bouncy_brick::{BouncyBrick, BOUNCY_BRICK_MAX_OFFSET, BOUNCY_BRICK_SPEED};
pub use bouncy_distro::{BouncyDistro, DISTRO_GRAVITY, DISTRO_START_VELOCITY};
pub use broken_brick::{BrokenBrick, BROKEN_BRICK_LIFETIME, BROKEN_BRICK_PIECE_SIZE};
pub use floating_score::{FloatingScore, FLOATING_SCORE_DRIFT, FLOATING_SCORE_LIFETIME};
pub use level::{EmptyLevel, LevelTiles};
pub use physic::{Physic, LEVEL_GRAVITY};
pub use render::{DrawCommand, DrawList, DrawingContext};
pub use timer::Countdown;
pub use trampoline::{Trampoline, TRAMPOLINE_SIZE};

/// Length of the reference frame per-step deltas are tuned for.
pub const FRAME_RATE_MS: f32 = 10.0;

/// Time advanced by one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// `elapsed` in reference frames; scales every per-step delta.
    pub ratio: f32,
    pub elapsed: Duration,
}

impl FrameStep {
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let ratio = elapsed.as_micros() as f32 / (FRAME_RATE_MS * 1000.0);
        Self { ratio, elapsed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Expired,
}

pub trait TransientEffect {
    fn step(&mut self, frame: FrameStep, level: &dyn LevelTiles) -> Lifecycle;
    fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

/// Ordered arena of effects of one kind.
#[derive(Debug, Clone)]
pub struct EffectCollection<T> {
    next_id: u64,
    effects: Vec<(EffectId, T)>,
}

impl<T> Default for EffectCollection<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            effects: Vec::new(),
        }
    }
}

impl<T: TransientEffect> EffectCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, effect: T) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.effects.push((id, effect));
        id
    }

    /// Removes the effect with `id`. Returns `None` when it is already gone.
    pub fn remove(&mut self, id: EffectId) -> Option<T> {
        let index = self.effects.iter().position(|(entry, _)| *entry == id)?;
        Some(self.effects.remove(index).1)
    }

    pub fn get(&self, id: EffectId) -> Option<&T> {
        self.effects
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, effect)| effect)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.effects.iter().map(|(_, effect)| effect)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Steps every effect once in spawn order and returns how many expired.
    pub fn step_all(&mut self, frame: FrameStep, level: &dyn LevelTiles) -> usize {
        let before = self.effects.len();
        self.effects
            .retain_mut(|(_, effect)| effect.step(frame, level) == Lifecycle::Active);
        before - self.effects.len()
    }

    pub fn draw_all(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        for effect in self.iter() {
            effect.draw(context, scroll);
        }
    }
}

/// Piece offsets and velocities for a brick shattered into four.
const BROKEN_BRICK_PIECES: [(f32, f32, f32, f32); 4] = [
    (0.0, 0.0, -1.0, -4.0),
    (0.0, 16.0, -1.5, -3.0),
    (16.0, 0.0, 1.0, -4.0),
    (16.0, 16.0, 1.5, -3.0),
];

/// All effect collections of the active world.
#[derive(Debug)]
pub struct TransientSet {
    pub bouncy_distros: EffectCollection<BouncyDistro>,
    pub broken_bricks: EffectCollection<BrokenBrick>,
    pub bouncy_bricks: EffectCollection<BouncyBrick>,
    pub floating_scores: EffectCollection<FloatingScore>,
    pub trampolines: EffectCollection<Trampoline>,
    rng: fastrand::Rng,
}

impl Default for TransientSet {
    fn default() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }
}

impl TransientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the fragment pattern of broken bricks, for replays and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            bouncy_distros: EffectCollection::new(),
            broken_bricks: EffectCollection::new(),
            bouncy_bricks: EffectCollection::new(),
            floating_scores: EffectCollection::new(),
            trampolines: EffectCollection::new(),
            rng,
        }
    }

    pub fn add_bouncy_distro(&mut self, x: f32, y: f32) -> EffectId {
        self.bouncy_distros.spawn(BouncyDistro::new(x, y))
    }

    pub fn add_broken_brick_piece(
        &mut self,
        tile_id: u32,
        x: f32,
        y: f32,
        xm: f32,
        ym: f32,
    ) -> EffectId {
        let fragment = Vec2::new(self.rng.u8(0..16) as f32, self.rng.u8(0..16) as f32);
        self.broken_bricks.spawn(BrokenBrick::new(
            tile_id,
            Vec2::new(x, y),
            Vec2::new(xm, ym),
            fragment,
        ))
    }

    /// Shatters the brick whose top-left corner is at `(x, y)` into four pieces.
    pub fn add_broken_brick(&mut self, tile_id: u32, x: f32, y: f32) -> [EffectId; 4] {
        BROKEN_BRICK_PIECES
            .map(|(dx, dy, xm, ym)| self.add_broken_brick_piece(tile_id, x + dx, y + dy, xm, ym))
    }

    pub fn add_bouncy_brick(&mut self, x: f32, y: f32, level: &dyn LevelTiles) -> EffectId {
        self.bouncy_bricks.spawn(BouncyBrick::new(x, y, level))
    }

    pub fn add_score(&mut self, x: f32, y: f32, value: i32) -> EffectId {
        self.floating_scores.spawn(FloatingScore::new(x, y, value))
    }

    pub fn add_trampoline(&mut self, x: f32, y: f32) -> EffectId {
        self.trampolines.spawn(Trampoline::new(x, y))
    }

    /// Advances every collection by one frame and returns how many effects expired.
    pub fn step(&mut self, frame: FrameStep, level: &dyn LevelTiles) -> usize {
        let expired = self.bouncy_distros.step_all(frame, level)
            + self.broken_bricks.step_all(frame, level)
            + self.bouncy_bricks.step_all(frame, level)
            + self.floating_scores.step_all(frame, level)
            + self.trampolines.step_all(frame, level);
        if expired > 0 {
            debug!(expired, remaining = self.len(), "transient_effects_expired");
        }
        expired
    }

    pub fn draw(&self, context: &mut dyn DrawingContext, scroll: Vec2) {
        self.bouncy_distros.draw_all(context, scroll);
        self.broken_bricks.draw_all(context, scroll);
        self.bouncy_bricks.draw_all(context, scroll);
        self.floating_scores.draw_all(context, scroll);
        self.trampolines.draw_all(context, scroll);
    }

    pub fn len(&self) -> usize {
        self.bouncy_distros.len()
            + self.broken_bricks.len()
            + self.bouncy_bricks.len()
            + self.floating_scores.len()
            + self.trampolines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
