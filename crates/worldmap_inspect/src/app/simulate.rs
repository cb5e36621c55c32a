use std::time::Duration;

use tracing::info;
use worldmap::worldmap::TILE_SIZE_PX;
use worldmap::{DrawList, FramePacer, LevelTiles, TransientSet, Vec2, WorldMap};

use super::report::SimulationSummary;

/// Wall-clock delta fed to the pacer per simulated frame.
const SIMULATED_FRAME: Duration = Duration::from_millis(16);
const SCORE_VALUE: i32 = 100;
const SCREEN_WIDTH_PX: f32 = 640.0;

/// Spawns one effect of each short-lived kind on the avatar's tile and runs
/// them for `budget` of simulated time.
pub(crate) fn simulate_effects(worldmap: &WorldMap, budget: Duration) -> SimulationSummary {
    let avatar = worldmap.avatar().position;
    let origin = Vec2::new(avatar.x * TILE_SIZE_PX, avatar.y * TILE_SIZE_PX);

    let mut effects = TransientSet::new();
    let tile_id = worldmap.tile_id_at(origin.x, origin.y);
    effects.add_broken_brick(tile_id, origin.x, origin.y);
    effects.add_score(origin.x, origin.y, SCORE_VALUE);
    effects.add_bouncy_distro(origin.x, origin.y);
    effects.add_bouncy_brick(origin.x, origin.y, worldmap);
    let spawned = effects.len();

    let mut pacer = FramePacer::default();
    let mut simulated = Duration::ZERO;
    let mut steps = 0u32;
    let mut expired = 0usize;
    while simulated < budget {
        let frame_dt = SIMULATED_FRAME.min(budget - simulated);
        simulated += frame_dt;
        for step in pacer.advance(frame_dt) {
            expired += effects.step(step, worldmap);
            steps = steps.saturating_add(1);
        }
    }

    let mut draw_list = DrawList::new(SCREEN_WIDTH_PX);
    effects.draw(&mut draw_list, Vec2::default());

    info!(
        simulated_ms = budget.as_millis() as u64,
        steps,
        spawned,
        expired,
        remaining = effects.len(),
        "effects_simulated"
    );

    SimulationSummary {
        simulated_ms: budget.as_millis() as u64,
        steps,
        spawned,
        expired,
        remaining: effects.len(),
        draw_commands: draw_list.commands().len(),
    }
}
