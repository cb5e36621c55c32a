use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod clock;
pub mod document;
pub mod geometry;
pub mod i18n;
pub mod tileset;
pub mod transient;
pub mod vfs;
pub mod worldmap;

pub use clock::{plan_frame_steps, FramePacer, StepPlan};
pub use document::{ReaderDocument, ReaderError, ReaderMapping, SourceLocation};
pub use geometry::{Color, Vec2};
pub use i18n::{Localization, TranslationCatalog, NO_TITLE_MSGID};
pub use tileset::{
    TileManager, Tileset, TilesetError, TilesetId, TilesetRegistry, TilesetSource,
    BUILTIN_WORLDMAP_TILESET,
};
pub use transient::{
    DrawList, DrawingContext, EffectCollection, EffectId, FrameStep, LevelTiles, Lifecycle,
    TransientEffect, TransientSet,
};
pub use vfs::{FileSystem, FileSystemError, MemoryFileSystem, NativeFileSystem};
pub use worldmap::{
    load_worldmap, FatalLoadError, LoadContext, LoadError, LoadReport, LoadWarning, LoaderConfig,
    WorldMap, MAIN_SPAWNPOINT,
};

pub const DATA_DIR_ENV_VAR: &str = "WORLDMAP_DATA_DIR";
pub const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Error)]
pub enum DataRootError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("data directory {path} does not exist or is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("{var} is set but does not point to a directory: {path}")]
    InvalidEnvRoot { path: PathBuf, var: &'static str },
    #[error(
        "Could not find a {dir_name}/ directory walking upward from {start_dir}\n\
Pass --data-dir or set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/game/data\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        dir_name: &'static str,
        env_var: &'static str,
    },
}

/// Picks the directory worldmap paths are resolved against: an explicit
/// directory, then [`DATA_DIR_ENV_VAR`], then the nearest `data/` directory
/// above the current directory.
pub fn resolve_data_root(explicit: Option<&Path>) -> Result<PathBuf, DataRootError> {
    if let Some(path) = explicit {
        return explicit_root(path);
    }
    let env_value = env::var(DATA_DIR_ENV_VAR);
    let start_dir = env::current_dir().map_err(DataRootError::CurrentDir)?;
    resolve_data_root_from(env_value, &start_dir)
}

fn explicit_root(path: &Path) -> Result<PathBuf, DataRootError> {
    if path.is_dir() {
        Ok(normalize_path(path))
    } else {
        Err(DataRootError::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}

fn resolve_data_root_from(
    env_value: Result<String, env::VarError>,
    start_dir: &Path,
) -> Result<PathBuf, DataRootError> {
    match env_value {
        Ok(value) => {
            let normalized = normalize_path(Path::new(&value));
            if normalized.is_dir() {
                Ok(normalized)
            } else {
                Err(DataRootError::InvalidEnvRoot {
                    path: normalized,
                    var: DATA_DIR_ENV_VAR,
                })
            }
        }
        Err(env::VarError::NotPresent) => {
            for candidate in start_dir.ancestors() {
                let data_dir = candidate.join(DATA_DIR_NAME);
                if data_dir.is_dir() {
                    return Ok(normalize_path(&data_dir));
                }
            }
            Err(DataRootError::RootNotFound {
                start_dir: normalize_path(start_dir),
                dir_name: DATA_DIR_NAME,
                env_var: DATA_DIR_ENV_VAR,
            })
        }
        Err(source) => Err(DataRootError::EnvVar {
            var: DATA_DIR_ENV_VAR,
            source,
        }),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn walks_upward_to_the_nearest_data_directory() {
        let temp = TempDir::new().expect("temp");
        let data = temp.path().join("data");
        let nested = temp.path().join("tools").join("bin");
        fs::create_dir_all(&data).expect("data");
        fs::create_dir_all(&nested).expect("nested");

        let root = resolve_data_root_from(Err(env::VarError::NotPresent), &nested).expect("root");
        assert_eq!(root, normalize_path(&data));
    }

    #[test]
    fn env_var_must_name_a_directory() {
        let temp = TempDir::new().expect("temp");
        let file = temp.path().join("not_a_dir");
        fs::write(&file, "x").expect("write");

        let err = resolve_data_root_from(Ok(file.display().to_string()), temp.path())
            .expect_err("file is not a root");
        assert!(matches!(err, DataRootError::InvalidEnvRoot { .. }));

        let root = resolve_data_root_from(Ok(temp.path().display().to_string()), Path::new("."))
            .expect("dir root");
        assert_eq!(root, normalize_path(temp.path()));
    }

    #[test]
    fn explicit_root_wins_and_is_checked() {
        let temp = TempDir::new().expect("temp");
        let root = resolve_data_root(Some(temp.path())).expect("explicit");
        assert_eq!(root, normalize_path(temp.path()));

        let missing = temp.path().join("missing");
        assert!(matches!(
            resolve_data_root(Some(&missing)),
            Err(DataRootError::NotADirectory { .. })
        ));
    }
}
