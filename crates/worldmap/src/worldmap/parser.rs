use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::{
    ReaderDocument, ReaderEntry, ReaderError, ReaderMapping, LEVEL_DOCUMENT_TAG,
};
use crate::geometry::Color;
use crate::i18n::{Localization, NO_TITLE_MSGID};
use crate::tileset::{Tileset, TilesetRegistry, TilesetSource};
use crate::vfs::{dirname, join, FileSystem};

use super::error::{FatalLoadError, LoadError, LoadReport, LoadWarning};
use super::objects::{
    Background, Decal, EntryError, LevelTile, SceneObject, SpawnPoint, SpecialTile, SpriteChange,
    Teleporter, TileMap,
};
use super::world::WorldMap;

/// Spawn point the avatar is placed on once loading finishes.
pub const MAIN_SPAWNPOINT: &str = "main";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub fallback_tileset: TilesetSource,
}

/// Collaborators a load reads from or registers with.
pub struct LoadContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub tilesets: &'a mut dyn TilesetRegistry,
    pub localization: &'a mut dyn Localization,
    pub config: &'a LoaderConfig,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        tilesets: &'a mut dyn TilesetRegistry,
        localization: &'a mut dyn Localization,
        config: &'a LoaderConfig,
    ) -> Self {
        Self {
            fs,
            tilesets,
            localization,
            config,
        }
    }
}

/// Loads `filename` into `worldmap` and places the avatar on [`MAIN_SPAWNPOINT`].
///
/// On failure the worldmap may be partially filled and should be discarded.
pub fn load_worldmap(
    worldmap: &mut WorldMap,
    filename: &str,
    ctx: &mut LoadContext<'_>,
) -> Result<LoadReport, LoadError> {
    WorldMapParser::new(worldmap, ctx).load_worldmap(filename)
}

struct SectorScope<'d> {
    mapping: ReaderMapping<'d>,
    tileset: Arc<Tileset>,
}

type EntryLoader =
    fn(&mut WorldMapParser<'_, '_>, &SectorScope<'_>, &ReaderEntry<'_>) -> Result<(), EntryError>;

const SECTOR_ENTRY_LOADERS: &[(&str, EntryLoader)] = &[
    ("tilemap", load_tilemap),
    ("background", load_background),
    ("music", load_music),
    ("init-script", load_init_script),
    ("worldmap-spawnpoint", load_spawnpoint),
    ("level", load_level),
    ("special-tile", load_special_tile),
    ("sprite-change", load_sprite_change),
    ("teleporter", load_teleporter),
    ("decal", load_decal),
    ("ambient-light", load_ambient_light),
];

const SKIPPED_SECTOR_KEYS: &[&str] = &["name"];

pub struct WorldMapParser<'w, 'c> {
    worldmap: &'w mut WorldMap,
    ctx: &'w mut LoadContext<'c>,
    report: LoadReport,
}

impl<'w, 'c> WorldMapParser<'w, 'c> {
    pub fn new(worldmap: &'w mut WorldMap, ctx: &'w mut LoadContext<'c>) -> Self {
        Self {
            worldmap,
            ctx,
            report: LoadReport::default(),
        }
    }

    pub fn load_worldmap(mut self, filename: &str) -> Result<LoadReport, LoadError> {
        self.worldmap.map_filename = filename.to_string();
        self.worldmap.levels_path = dirname(filename);

        match self.load_document(filename) {
            Ok(()) => {
                info!(
                    filename,
                    name = %self.worldmap.name,
                    object_count = self.worldmap.object_count(),
                    level_count = self.worldmap.levels.len(),
                    spawn_point_count = self.worldmap.spawn_points.len(),
                    warning_count = self.report.warnings.len(),
                    "worldmap_loaded"
                );
                Ok(self.report)
            }
            Err(source) => Err(LoadError {
                filename: filename.to_string(),
                source,
            }),
        }
    }

    fn load_document(&mut self, filename: &str) -> Result<(), FatalLoadError> {
        self.ctx.localization.register_translation_directory(filename);
        let doc = ReaderDocument::from_file(self.ctx.fs, filename)?;
        let root = doc.root();
        if root.name() != LEVEL_DOCUMENT_TAG {
            return Err(FatalLoadError::ContentType {
                expected: LEVEL_DOCUMENT_TAG,
                found: root.name().to_string(),
            });
        }

        let level = root.mapping();
        if let Some(name) = level.get_string("name") {
            self.worldmap.name = self.ctx.localization.translate(&name);
        }
        let tileset = self.resolve_tileset(&level)?;

        let sector = level
            .get_mapping("sector")
            .ok_or(FatalLoadError::MissingSector)?;
        let scope = SectorScope {
            mapping: sector,
            tileset,
        };
        for entry in sector.iter() {
            self.load_sector_entry(&scope, &entry);
        }

        self.worldmap.update_game_objects();

        if self.worldmap.get_solid_tilemaps().is_empty() {
            return Err(FatalLoadError::NoSolidLayer);
        }

        self.worldmap.move_to_spawnpoint(MAIN_SPAWNPOINT)
    }

    /// First `tileset` key wins; a tileset already set on the worldmap wins
    /// over all of them.
    fn resolve_tileset(
        &mut self,
        level: &ReaderMapping<'_>,
    ) -> Result<Arc<Tileset>, FatalLoadError> {
        for name in level.get_all_strings("tileset") {
            if self.worldmap.tileset.is_some() {
                self.warn(LoadWarning::DuplicateTileset { name });
                continue;
            }
            let tileset = self.lookup_tileset(&name)?;
            self.worldmap.tileset = Some(tileset);
        }

        match &self.worldmap.tileset {
            Some(tileset) => Ok(Arc::clone(tileset)),
            None => {
                let name = self.ctx.config.fallback_tileset.identifier().to_string();
                debug!(tileset = %name, "worldmap_fallback_tileset");
                let tileset = self.lookup_tileset(&name)?;
                self.worldmap.tileset = Some(Arc::clone(&tileset));
                Ok(tileset)
            }
        }
    }

    fn lookup_tileset(&mut self, name: &str) -> Result<Arc<Tileset>, FatalLoadError> {
        self.ctx
            .tilesets
            .get_tileset(name)
            .map_err(|source| FatalLoadError::Tileset {
                name: name.to_string(),
                source,
            })
    }

    fn load_sector_entry(&mut self, scope: &SectorScope<'_>, entry: &ReaderEntry<'_>) {
        let key = entry.key();
        match SECTOR_ENTRY_LOADERS.iter().find(|(name, _)| *name == key) {
            Some((_, loader)) => {
                if let Err(error) = loader(self, scope, entry) {
                    self.warn(LoadWarning::MalformedEntry {
                        key: key.to_string(),
                        message: error.to_string(),
                    });
                }
            }
            None if SKIPPED_SECTOR_KEYS.contains(&key) => {}
            None => self.warn(LoadWarning::UnknownEntry {
                key: key.to_string(),
                location: entry.location(),
            }),
        }
    }

    /// Fills in title and target time from the referenced level file.
    /// Never fails; problems leave the defaults in place.
    fn load_level_information(&mut self, level: &mut LevelTile) {
        level.title = self.ctx.localization.translate(NO_TITLE_MSGID);
        level.target_time = 0.0;

        let filename = if self.worldmap.levels_path == "./" {
            level.name.clone()
        } else {
            join(&self.worldmap.levels_path, &level.name)
        };

        if !self.ctx.fs.exists(&filename) {
            self.warn(LoadWarning::LevelFileMissing { path: filename });
            return;
        }
        if self.ctx.fs.is_directory(&filename) {
            self.warn(LoadWarning::LevelFileIsDirectory { path: filename });
            return;
        }

        self.ctx.localization.register_translation_directory(&filename);
        let fs = self.ctx.fs;
        if let Err(error) = read_level_header(fs, &*self.ctx.localization, &filename, level) {
            self.warn(LoadWarning::LevelInfoUnreadable {
                path: filename,
                message: error.to_string(),
            });
        }
    }

    fn warn(&mut self, warning: LoadWarning) {
        warn!(
            filename = %self.worldmap.map_filename,
            warning = %warning,
            "worldmap_load_warning"
        );
        self.report.warnings.push(warning);
    }
}

/// Documents with a different root tag are not level files and are left alone.
fn read_level_header(
    fs: &dyn FileSystem,
    localization: &dyn Localization,
    filename: &str,
    level: &mut LevelTile,
) -> Result<(), ReaderError> {
    let doc = ReaderDocument::from_file(fs, filename)?;
    let root = doc.root();
    if root.name() != LEVEL_DOCUMENT_TAG {
        return Ok(());
    }
    let mapping = root.mapping();
    if let Some(title) = mapping.get_string("name") {
        level.title = localization.translate(&title);
    }
    if let Some(target_time) = mapping.get_f32("target-time")? {
        level.target_time = target_time;
    }
    Ok(())
}

fn load_tilemap(
    parser: &mut WorldMapParser<'_, '_>,
    scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let tilemap = TileMap::from_mapping(Arc::clone(&scope.tileset), &entry.as_mapping())?;
    parser.worldmap.add_object(SceneObject::TileMap(tilemap));
    Ok(())
}

fn load_background(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let background = Background::from_mapping(&entry.as_mapping())?;
    parser
        .worldmap
        .add_object(SceneObject::Background(background));
    Ok(())
}

fn load_music(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    parser.worldmap.music = Some(entry.as_string().to_string());
    Ok(())
}

fn load_init_script(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    parser.worldmap.init_script = Some(entry.as_string().to_string());
    Ok(())
}

fn load_spawnpoint(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let spawn = SpawnPoint::from_mapping(&entry.as_mapping())?;
    parser.worldmap.spawn_points.push(spawn);
    Ok(())
}

fn load_level(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let mut level = LevelTile::from_mapping(&parser.worldmap.levels_path, &entry.as_mapping())?;
    parser.load_level_information(&mut level);
    let id = parser.worldmap.add_object(SceneObject::Level(level));
    parser.worldmap.levels.push(id);
    Ok(())
}

fn load_special_tile(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let special_tile = SpecialTile::from_mapping(&entry.as_mapping())?;
    let id = parser
        .worldmap
        .add_object(SceneObject::SpecialTile(special_tile));
    parser.worldmap.special_tiles.push(id);
    Ok(())
}

fn load_sprite_change(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let sprite_change = SpriteChange::from_mapping(&entry.as_mapping())?;
    let id = parser
        .worldmap
        .add_object(SceneObject::SpriteChange(sprite_change));
    parser.worldmap.sprite_changes.push(id);
    Ok(())
}

fn load_teleporter(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let teleporter = Teleporter::from_mapping(&entry.as_mapping())?;
    let id = parser
        .worldmap
        .add_object(SceneObject::Teleporter(teleporter));
    parser.worldmap.teleporters.push(id);
    Ok(())
}

fn load_decal(
    parser: &mut WorldMapParser<'_, '_>,
    _scope: &SectorScope<'_>,
    entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let decal = Decal::from_mapping(&entry.as_mapping())?;
    parser.worldmap.add_object(SceneObject::Decal(decal));
    Ok(())
}

/// Reads the color from the sector itself rather than the entry, so a
/// repeated `ambient-light` key re-reads the first one.
fn load_ambient_light(
    parser: &mut WorldMapParser<'_, '_>,
    scope: &SectorScope<'_>,
    _entry: &ReaderEntry<'_>,
) -> Result<(), EntryError> {
    let color = scope
        .mapping
        .get_f32_list("ambient-light")
        .ok()
        .flatten()
        .and_then(|components| Color::from_components(&components));
    match color {
        Some(color) => parser.worldmap.ambient_light = color,
        None => parser.warn(LoadWarning::AmbientLightNeedsColor),
    }
    Ok(())
}
