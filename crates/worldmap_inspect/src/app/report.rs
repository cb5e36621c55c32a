use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;
use worldmap::worldmap::Direction;
use worldmap::{LoadReport, WorldMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct WorldMapSummary {
    pub(crate) file: String,
    pub(crate) name: String,
    pub(crate) tileset: Option<String>,
    pub(crate) music: Option<String>,
    pub(crate) init_script: Option<String>,
    pub(crate) ambient_light: [f32; 4],
    pub(crate) avatar: AvatarSummary,
    pub(crate) object_counts: BTreeMap<&'static str, usize>,
    pub(crate) spawn_points: Vec<SpawnPointSummary>,
    pub(crate) levels: Vec<LevelSummary>,
    pub(crate) teleporters: Vec<TeleporterSummary>,
    pub(crate) special_tile_count: usize,
    pub(crate) sprite_change_count: usize,
    pub(crate) warnings: Vec<String>,
    pub(crate) simulation: Option<SimulationSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AvatarSummary {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) direction: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SpawnPointSummary {
    pub(crate) name: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct LevelSummary {
    pub(crate) name: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) title: String,
    pub(crate) target_time: f32,
    pub(crate) auto_play: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TeleporterSummary {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) worldmap: Option<String>,
    pub(crate) spawnpoint: Option<String>,
    pub(crate) automatic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SimulationSummary {
    pub(crate) simulated_ms: u64,
    pub(crate) steps: u32,
    pub(crate) spawned: usize,
    pub(crate) expired: usize,
    pub(crate) remaining: usize,
    pub(crate) draw_commands: usize,
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "north",
        Direction::East => "east",
        Direction::South => "south",
        Direction::West => "west",
    }
}

impl WorldMapSummary {
    pub(crate) fn from_worldmap(worldmap: &WorldMap, report: &LoadReport) -> Self {
        let mut object_counts = BTreeMap::new();
        for entry in worldmap.objects() {
            *object_counts.entry(entry.object.kind_name()).or_insert(0) += 1;
        }
        let light = worldmap.ambient_light();
        let avatar = worldmap.avatar();

        Self {
            file: worldmap.map_filename().to_string(),
            name: worldmap.name().to_string(),
            tileset: worldmap.tileset().map(|tileset| tileset.name.clone()),
            music: worldmap.music().map(ToString::to_string),
            init_script: worldmap.init_script().map(ToString::to_string),
            ambient_light: [light.red, light.green, light.blue, light.alpha],
            avatar: AvatarSummary {
                x: avatar.position.x,
                y: avatar.position.y,
                direction: avatar.direction.map(direction_name),
            },
            object_counts,
            spawn_points: worldmap
                .spawn_points()
                .iter()
                .map(|spawn| SpawnPointSummary {
                    name: spawn.name.clone(),
                    x: spawn.position.x,
                    y: spawn.position.y,
                })
                .collect(),
            levels: worldmap
                .levels()
                .map(|level| LevelSummary {
                    name: level.name.clone(),
                    x: level.position.x,
                    y: level.position.y,
                    title: level.title.clone(),
                    target_time: level.target_time,
                    auto_play: level.auto_play,
                })
                .collect(),
            teleporters: worldmap
                .teleporters()
                .map(|teleporter| TeleporterSummary {
                    x: teleporter.position.x,
                    y: teleporter.position.y,
                    worldmap: teleporter.worldmap.clone(),
                    spawnpoint: teleporter.spawnpoint.clone(),
                    automatic: teleporter.automatic,
                })
                .collect(),
            special_tile_count: worldmap.special_tiles().count(),
            sprite_change_count: worldmap.sprite_changes().count(),
            warnings: report
                .warnings
                .iter()
                .map(ToString::to_string)
                .collect(),
            simulation: None,
        }
    }

    pub(crate) fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "worldmap: {} ({})", self.name, self.file)?;
        writeln!(
            out,
            "tileset: {}",
            self.tileset.as_deref().unwrap_or("<none>")
        )?;
        if let Some(music) = &self.music {
            writeln!(out, "music: {music}")?;
        }
        writeln!(
            out,
            "avatar: ({}, {}) facing {}",
            self.avatar.x,
            self.avatar.y,
            self.avatar.direction.unwrap_or("-")
        )?;

        let counts = self
            .object_counts
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "objects: {counts}")?;

        writeln!(out, "levels ({}):", self.levels.len())?;
        for level in &self.levels {
            writeln!(
                out,
                "  ({}, {}) {} \"{}\" target {}s",
                level.x, level.y, level.name, level.title, level.target_time
            )?;
        }
        for teleporter in &self.teleporters {
            writeln!(
                out,
                "teleporter ({}, {}) -> {}",
                teleporter.x,
                teleporter.y,
                teleporter.worldmap.as_deref().unwrap_or("<this map>")
            )?;
        }

        writeln!(out, "warnings ({}):", self.warnings.len())?;
        for warning in &self.warnings {
            writeln!(out, "  {warning}")?;
        }

        if let Some(simulation) = &self.simulation {
            writeln!(
                out,
                "simulated {}ms in {} steps: spawned {}, expired {}, effects remaining: {}",
                simulation.simulated_ms,
                simulation.steps,
                simulation.spawned,
                simulation.expired,
                simulation.remaining
            )?;
        }
        Ok(())
    }
}
