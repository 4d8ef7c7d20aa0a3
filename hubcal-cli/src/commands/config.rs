use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use hubcal_core::config::HubCalConfig;
use hubcal_core::store::JsonFileStore;
use hubcal_core::view::{ViewMode, WeekStart};
use owo_colors::OwoColorize;

/// Settings `hubcal config` can change; without any it only prints.
#[derive(Args, Debug, Default)]
pub struct ConfigChanges {
    /// Owner whose events are shown and created
    #[arg(long)]
    pub owner: Option<String>,

    /// View used when none is given (month, week or day)
    #[arg(long)]
    pub view: Option<ViewMode>,

    /// First day of the week (sunday or monday)
    #[arg(long)]
    pub week_start: Option<WeekStart>,

    /// JSON file holding the events
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "hubcal_core=debug"
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.owner.is_none()
            && self.view.is_none()
            && self.week_start.is_none()
            && self.data_file.is_none()
            && self.log_level.is_none()
    }

    fn apply(self, config: &mut HubCalConfig) {
        if let Some(owner) = self.owner {
            config.owner = owner;
        }
        if let Some(view) = self.view {
            config.default_view = view;
        }
        if let Some(week_start) = self.week_start {
            config.week_start = week_start;
        }
        if let Some(data_file) = self.data_file {
            config.data_file = data_file;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
    }
}

pub fn run(store: &JsonFileStore, config: &HubCalConfig, changes: ConfigChanges) -> Result<()> {
    let config_path = HubCalConfig::config_path()?;

    if changes.is_empty() {
        println!("{}", "Paths".bold());
        println!("  Config:  {}", config_path.display());
        println!("  Events:  {}", store.path().display());
        println!();
        println!("{}", "Settings".bold());
        println!("  owner         {}", config.owner);
        println!("  default_view  {}", config.default_view);
        println!("  week_start    {}", config.week_start);
        println!("  log_level     {}", config.log_level);
        return Ok(());
    }

    save_changes(&config_path, changes)?;
    println!("{}", format!("  Saved {}", config_path.display()).green());

    Ok(())
}

/// Apply `changes` to the file at `path`, ignoring environment overrides.
fn save_changes(path: &Path, changes: ConfigChanges) -> Result<HubCalConfig> {
    let mut saved = HubCalConfig::load_from(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    changes.apply(&mut saved);
    saved.save(path)?;

    Ok(saved)
}
