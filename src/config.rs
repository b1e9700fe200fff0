use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tessel_runtime::SchedulerConfig;
use tessel_world::WorldConfig;

/// Top-level settings file: a `[world]` and a `[scheduler]` table.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TesselConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl TesselConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let cfg: TesselConfig = toml::from_str(&s)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.world.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}
