use crate::geometry::Vec2;

/// Level gravity; one hundredth of it is added to the vertical velocity per
/// reference frame while gravity is enabled.
pub const LEVEL_GRAVITY: f32 = 10.0;

/// Velocity integrator in screen space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physic {
    velocity: Vec2,
    gravity_enabled: bool,
}

impl Default for Physic {
    fn default() -> Self {
        Self {
            velocity: Vec2::default(),
            gravity_enabled: true,
        }
    }
}

impl Physic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    pub fn enable_gravity(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Integrates one step scaled by `ratio` and moves `position` in place.
    pub fn apply(&mut self, ratio: f32, position: &mut Vec2) {
        let ay = if self.gravity_enabled {
            LEVEL_GRAVITY / 100.0
        } else {
            0.0
        };

        position.x += self.velocity.x * ratio;
        position.y += self.velocity.y * ratio + ay * ratio * ratio;
        self.velocity.y += ay * ratio;
    }
}
