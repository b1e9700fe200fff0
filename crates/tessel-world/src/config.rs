use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tessel_chunk::CHUNK_SIZE;

use crate::biome::{BiomeDef, default_biomes};

/// World shape and generation settings.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    /// Columns kept resident on each side of the observer.
    #[serde(default = "default_draw_distance")]
    pub draw_distance: usize,
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    /// Scale applied to world XZ before biome sampling.
    #[serde(default = "default_smoothness")]
    pub smoothness: f32,
    #[serde(default = "default_light_falloff")]
    pub light_falloff: f32,
    #[serde(default = "default_biomes")]
    pub biomes: Vec<BiomeDef>,
}

fn default_seed() -> i32 {
    1337
}
fn default_draw_distance() -> usize {
    4
}
fn default_min_height() -> i32 {
    0
}
fn default_max_height() -> i32 {
    128
}
fn default_smoothness() -> f32 {
    0.004
}
fn default_light_falloff() -> f32 {
    0.08
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            draw_distance: default_draw_distance(),
            min_height: default_min_height(),
            max_height: default_max_height(),
            smoothness: default_smoothness(),
            light_falloff: default_light_falloff(),
            biomes: default_biomes(),
        }
    }
}

impl WorldConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let cfg: WorldConfig = toml::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let cs = CHUNK_SIZE as i32;
        if self.min_height.rem_euclid(cs) != 0 || self.max_height.rem_euclid(cs) != 0 {
            return Err(format!(
                "min_height ({}) and max_height ({}) must be multiples of {cs}",
                self.min_height, self.max_height
            )
            .into());
        }
        if self.min_height >= self.max_height {
            return Err("min_height must be below max_height".into());
        }
        if self.draw_distance == 0 {
            return Err("draw_distance must be at least 1".into());
        }
        if !(self.light_falloff > 0.0 && self.light_falloff < 1.0) {
            return Err("light_falloff must be in (0, 1)".into());
        }
        Ok(())
    }

    /// Side length of the resident window in columns.
    #[inline]
    pub fn dimension(&self) -> usize {
        2 * self.draw_distance + 1
    }

    #[inline]
    pub fn chunks_vertically(&self) -> usize {
        ((self.max_height - self.min_height) / CHUNK_SIZE as i32) as usize
    }
}
