mod bootstrap;
mod config;
mod report;
mod simulate;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};
use worldmap::{
    load_worldmap, resolve_data_root, LoadContext, NativeFileSystem, TileManager,
    TranslationCatalog, WorldMap,
};

pub(crate) use bootstrap::init_tracing;
pub(crate) use config::{load_config, InspectConfig};
pub(crate) use report::WorldMapSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InspectOptions {
    pub(crate) worldmap: String,
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) json: bool,
    pub(crate) simulate_ms: Option<u64>,
}

pub(crate) fn run(options: &InspectOptions, out: &mut dyn Write) -> Result<(), String> {
    let config = match &options.config_path {
        Some(path) => load_config(path),
        None => Ok(InspectConfig::default()),
    };
    let log_filter = config
        .as_ref()
        .ok()
        .and_then(|config| config.log_filter.clone());
    init_tracing(log_filter.as_deref());

    inspect(options, config, out).map_err(|message| {
        error!(worldmap = %options.worldmap, error = %message, "inspect_failed");
        message
    })
}

fn inspect(
    options: &InspectOptions,
    config: Result<InspectConfig, String>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let config = config?;
    let data_root =
        resolve_data_root(options.data_dir.as_deref()).map_err(|error| error.to_string())?;
    info!(data_root = %data_root.display(), worldmap = %options.worldmap, "inspect_started");

    let fs = NativeFileSystem::new(data_root);
    let mut tilesets = TileManager::new();
    let mut catalog = TranslationCatalog::with_messages(config.translations.clone());
    let mut ctx = LoadContext::new(&fs, &mut tilesets, &mut catalog, &config.loader);

    let mut worldmap = WorldMap::new();
    let load_report = load_worldmap(&mut worldmap, &options.worldmap, &mut ctx)
        .map_err(|error| error.to_string())?;

    let mut summary = WorldMapSummary::from_worldmap(&worldmap, &load_report);
    if let Some(ms) = options.simulate_ms {
        summary.simulation = Some(simulate::simulate_effects(
            &worldmap,
            Duration::from_millis(ms),
        ));
    }

    if options.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|error| format!("serialize summary: {error}"))?;
        writeln!(out, "{json}").map_err(|error| format!("write summary: {error}"))?;
    } else {
        summary
            .write_text(out)
            .map_err(|error| format!("write summary: {error}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const MAP: &str = r#"<level-document>
  <name>Icy Island</name>
  <sector>
    <tilemap solid="true" width="4" height="4">
      <tiles>0 0 0 0  0 0 0 0  0 0 0 0  1 1 1 1</tiles>
    </tilemap>
    <worldmap-spawnpoint name="main" x="1" y="2"/>
    <level name="intro.stl" x="1" y="2"/>
    <level name="missing.stl" x="2" y="2"/>
    <teleporter x="3" y="2" worldmap="levels/world2/worldmap.stwm"/>
  </sector>
</level-document>"#;

    fn data_dir() -> TempDir {
        let temp = TempDir::new().expect("temp");
        let world = temp.path().join("levels").join("world1");
        fs::create_dir_all(&world).expect("mkdir");
        fs::write(world.join("worldmap.stwm"), MAP).expect("map");
        fs::write(
            world.join("intro.stl"),
            "<level-document><name>Intro</name><target-time>30</target-time></level-document>",
        )
        .expect("level");
        temp
    }

    fn options(temp: &TempDir) -> InspectOptions {
        InspectOptions {
            worldmap: "levels/world1/worldmap.stwm".to_string(),
            data_dir: Some(temp.path().to_path_buf()),
            ..InspectOptions::default()
        }
    }

    #[test]
    fn json_summary_lists_levels_and_warnings() {
        let temp = data_dir();
        let mut options = options(&temp);
        options.json = true;
        let mut out = Vec::new();

        inspect(&options, Ok(InspectConfig::default()), &mut out).expect("inspect");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["name"], "Icy Island");
        assert_eq!(value["avatar"]["x"], 1.0);
        assert_eq!(value["levels"][0]["title"], "Intro");
        assert_eq!(value["levels"][1]["title"], "<no title>");
        assert_eq!(value["teleporters"].as_array().expect("array").len(), 1);
        assert_eq!(value["warnings"].as_array().expect("array").len(), 1);
        assert!(value["simulation"].is_null());
    }

    #[test]
    fn text_summary_includes_simulation() {
        let temp = data_dir();
        let mut options = options(&temp);
        options.simulate_ms = Some(2000);
        let mut out = Vec::new();

        inspect(&options, Ok(InspectConfig::default()), &mut out).expect("inspect");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("worldmap: Icy Island"));
        assert!(text.contains("intro.stl"));
        assert!(text.contains("effects remaining: 0"));
    }

    #[test]
    fn translations_from_config_apply_to_titles() {
        let temp = data_dir();
        let mut options = options(&temp);
        options.json = true;
        let mut config = InspectConfig::default();
        config
            .translations
            .insert("Intro".to_string(), "Einleitung".to_string());
        let mut out = Vec::new();

        inspect(&options, Ok(config), &mut out).expect("inspect");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["levels"][0]["title"], "Einleitung");
    }

    #[test]
    fn load_failure_is_one_message_with_the_file_name() {
        let temp = data_dir();
        let mut options = options(&temp);
        options.worldmap = "levels/world1/nowhere.stwm".to_string();
        let mut out = Vec::new();

        let message = inspect(&options, Ok(InspectConfig::default()), &mut out)
            .expect_err("missing map");
        assert!(message.starts_with("problem when parsing worldmap 'levels/world1/nowhere.stwm'"));
        assert!(out.is_empty());
    }

    #[test]
    fn config_error_is_reported_before_loading() {
        let temp = data_dir();
        let options = options(&temp);
        let mut out = Vec::new();
        let message = inspect(&options, Err("parse config json: bad".to_string()), &mut out)
            .expect_err("config");
        assert_eq!(message, "parse config json: bad");
    }
}
