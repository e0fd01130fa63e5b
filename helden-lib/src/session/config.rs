use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::{Result, fs::config_dir};

const FILE_NAME: &str = "core.toml";

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

/// Language used for user-facing status messages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    German,
}

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub language: Language,
    /// Profiles created when a new session starts. The first one becomes active.
    pub default_profiles: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            default_profiles: vec!["User 1".to_string(), "User 2".to_string()],
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the user's config directory, writing the
    /// defaults there first if no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    pub fn into_handle(self) -> Cfg {
        Arc::new(RwLock::new(self))
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }
}
