use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::difficulty::Difficulty;

/// Player preferences carried between launches. Never holds session state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "tier_or_default")]
    pub difficulty: Difficulty,
    pub sound: bool,
}

/// An unknown tier name costs only the tier, not the rest of the preferences
fn tier_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Difficulty, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(Difficulty::resolve_or_default(&name))
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "canrun") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("canrun_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            log::warn!("ignoring malformed {}: {err}", self.path.display());
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
