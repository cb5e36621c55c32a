//! Fixed-step frame pacing for the effect simulation.

use std::time::Duration;

use tracing::warn;

use crate::transient::FrameStep;

pub const DEFAULT_FIXED_DT: Duration = Duration::from_millis(10);
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

pub fn plan_frame_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

/// Turns variable wall-clock frame deltas into fixed [`FrameStep`]s.
#[derive(Debug, Clone)]
pub struct FramePacer {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_steps_per_frame: u32,
    accumulator: Duration,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(
            DEFAULT_FIXED_DT,
            DEFAULT_MAX_FRAME_DELTA,
            DEFAULT_MAX_STEPS_PER_FRAME,
        )
    }
}

impl FramePacer {
    /// A zero `fixed_dt` falls back to [`DEFAULT_FIXED_DT`].
    pub fn new(fixed_dt: Duration, max_frame_delta: Duration, max_steps_per_frame: u32) -> Self {
        let fixed_dt = if fixed_dt.is_zero() {
            DEFAULT_FIXED_DT
        } else {
            fixed_dt
        };
        Self {
            fixed_dt,
            max_frame_delta,
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Feeds one frame's wall-clock delta and returns the steps to simulate.
    pub fn advance(&mut self, frame_dt: Duration) -> Vec<FrameStep> {
        let clamped = clamp_frame_delta(frame_dt, self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(clamped);

        let plan = plan_frame_steps(self.accumulator, self.fixed_dt, self.max_steps_per_frame);
        self.accumulator = plan.remaining_accumulator;
        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_steps_per_frame = self.max_steps_per_frame,
                "frame_step_clamp_triggered"
            );
        }

        let step = FrameStep::from_elapsed(self.fixed_dt);
        vec![step; plan.ticks_to_run as usize]
    }
}
