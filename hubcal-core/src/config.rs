//! hubcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{HubCalError, HubCalResult};
use crate::view::{ViewMode, WeekStart};

static DEFAULT_DATA_FILE: &str = "~/.local/share/hubcal/events.json";
static DEFAULT_OWNER: &str = "me";
static DEFAULT_LOG_LEVEL: &str = "warn";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Configuration at ~/.config/hubcal/config.toml
///
/// Every key can be overridden with a `HUBCAL_`-prefixed environment
/// variable, e.g. `HUBCAL_OWNER=alice`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HubCalConfig {
    /// JSON file holding the events
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Owner whose events are shown and created
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default)]
    pub default_view: ViewMode,

    #[serde(default)]
    pub week_start: WeekStart,

    /// Log filter used when HUBCAL_LOG / RUST_LOG are unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HubCalConfig {
    fn default() -> Self {
        HubCalConfig {
            data_file: default_data_file(),
            owner: default_owner(),
            default_view: ViewMode::default(),
            week_start: WeekStart::default(),
            log_level: default_log_level(),
        }
    }
}

impl HubCalConfig {
    pub fn config_path() -> HubCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HubCalError::Config("Could not determine config directory".into()))?
            .join("hubcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented default file on first run.
    pub fn load() -> HubCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::build(&config_path, true)
    }

    /// Load a config file without environment overrides.
    pub fn load_from(path: &Path) -> HubCalResult<Self> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> HubCalResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if with_env {
            builder = builder.add_source(Environment::with_prefix("HUBCAL"));
        }

        builder
            .build()
            .map_err(|e| HubCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HubCalError::Config(e.to_string()))
    }

    /// Data file path with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn save(&self, path: &Path) -> HubCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HubCalError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| HubCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HubCalResult<()> {
        let contents = format!(
            "\
# hubcal configuration

# Where events are stored:
# data_file = \"{DEFAULT_DATA_FILE}\"

# Whose events to show:
# owner = \"{DEFAULT_OWNER}\"

# View used when none is given (month, week or day):
# default_view = \"month\"

# First day of the week (sunday or monday):
# week_start = \"sunday\"

# Log filter:
# log_level = \"{DEFAULT_LOG_LEVEL}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HubCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HubCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
