use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use worldmap::LoaderConfig;

/// Optional JSON config for the inspector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct InspectConfig {
    pub(crate) loader: LoaderConfig,
    pub(crate) log_filter: Option<String>,
    /// msgid to msgstr table handed to the translation catalog.
    pub(crate) translations: HashMap<String, String>,
}

pub(crate) fn load_config(path: &Path) -> Result<InspectConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read config {}: {error}", path.display()))?;
    parse_config_json(&raw)
}

fn parse_config_json(raw: &str) -> Result<InspectConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, InspectConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse config json: {source}"))
            } else {
                Err(format!("parse config json at {path}: {source}"))
            }
        }
    }
}
