use std::error::Error;

use serde::Deserialize;
use tessel_blocks::{BlockId, BlockRegistry};

/// Maps a biome noise sample to generation parameters.
pub trait BiomeClassifier: Send + Sync {
    fn classify(&self, noise: f32) -> &BiomeParams;
}

/// Absolute world heights and noise shaping for the three terrain layers.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LayerHeights {
    pub lower_base: i32,
    pub lower_min: i32,
    pub mountain_frequency: f32,
    pub mountain_height: i32,
    pub lower_noise_frequency: f32,
    pub lower_noise_height: i32,
    pub mid_base: i32,
    pub mid_noise_frequency: f32,
    pub mid_noise_height: i32,
    pub top_base: i32,
    pub top_noise_frequency: f32,
    pub top_noise_height: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TreeParams {
    pub probability: f32,
    pub zoom: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CaveParams {
    pub size: i32,
    pub frequency: f32,
}

/// Biome as written in config: blocks referenced by name.
#[derive(Clone, Debug, Deserialize)]
pub struct BiomeDef {
    pub name: String,
    /// Inclusive upper bound of the biome noise range this biome covers.
    pub upper_bound: f32,
    pub heights: LayerHeights,
    pub lower_block: String,
    pub mid_block: String,
    pub top_block: String,
    #[serde(default = "default_trunk")]
    pub trunk_block: String,
    #[serde(default = "default_leaves")]
    pub leaves_block: String,
    pub trees: TreeParams,
    pub caves: CaveParams,
}

fn default_trunk() -> String {
    "log".into()
}

fn default_leaves() -> String {
    "leaves".into()
}

#[derive(Clone, Debug, PartialEq)]
pub struct BiomeParams {
    pub name: String,
    pub upper_bound: f32,
    pub heights: LayerHeights,
    pub lower_block: BlockId,
    pub mid_block: BlockId,
    pub top_block: BlockId,
    pub trunk_block: BlockId,
    pub leaves_block: BlockId,
    pub trees: TreeParams,
    pub caves: CaveParams,
}

impl BiomeParams {
    pub fn resolve(def: &BiomeDef, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let id = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| format!("biome '{}': unknown block '{name}'", def.name))
        };
        Ok(Self {
            name: def.name.clone(),
            upper_bound: def.upper_bound,
            heights: def.heights.clone(),
            lower_block: id(&def.lower_block)?,
            mid_block: id(&def.mid_block)?,
            top_block: id(&def.top_block)?,
            trunk_block: id(&def.trunk_block)?,
            leaves_block: id(&def.leaves_block)?,
            trees: def.trees.clone(),
            caves: def.caves.clone(),
        })
    }
}

/// Ordered threshold table: the first biome whose `upper_bound` is at least
/// the sample wins; samples above every bound use the last entry.
#[derive(Clone, Debug)]
pub struct BiomeTable {
    biomes: Vec<BiomeParams>,
}

impl BiomeTable {
    pub fn from_defs(defs: &[BiomeDef], reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        if defs.is_empty() {
            return Err("at least one biome is required".into());
        }
        let mut biomes = defs
            .iter()
            .map(|d| BiomeParams::resolve(d, reg))
            .collect::<Result<Vec<_>, _>>()?;
        biomes.sort_by(|a, b| a.upper_bound.total_cmp(&b.upper_bound));
        Ok(Self { biomes })
    }

    pub fn biomes(&self) -> &[BiomeParams] {
        &self.biomes
    }
}

impl BiomeClassifier for BiomeTable {
    fn classify(&self, noise: f32) -> &BiomeParams {
        let last = self.biomes.len() - 1;
        self.biomes
            .iter()
            .find(|b| noise <= b.upper_bound)
            .unwrap_or(&self.biomes[last])
    }
}

/// Built-in desert / plains / forest-hills set.
pub fn default_biomes() -> Vec<BiomeDef> {
    let layered = |lower_base, mountain_height, top_noise_height| LayerHeights {
        lower_base,
        lower_min: 8,
        mountain_frequency: 0.012,
        mountain_height,
        lower_noise_frequency: 0.05,
        lower_noise_height: 4,
        mid_base: 3,
        mid_noise_frequency: 0.06,
        mid_noise_height: 2,
        top_base: 1,
        top_noise_frequency: 0.1,
        top_noise_height,
    };
    vec![
        BiomeDef {
            name: "desert".into(),
            upper_bound: -0.4,
            heights: layered(24, 6, 2),
            lower_block: "stone".into(),
            mid_block: "sand".into(),
            top_block: "sand".into(),
            trunk_block: default_trunk(),
            leaves_block: default_leaves(),
            trees: TreeParams {
                probability: 0.0,
                zoom: 0.9,
            },
            caves: CaveParams {
                size: 3,
                frequency: 0.07,
            },
        },
        BiomeDef {
            name: "plains".into(),
            upper_bound: 0.4,
            heights: layered(28, 12, 1),
            lower_block: "stone".into(),
            mid_block: "dirt".into(),
            top_block: "grass".into(),
            trunk_block: default_trunk(),
            leaves_block: default_leaves(),
            trees: TreeParams {
                probability: 0.12,
                zoom: 0.9,
            },
            caves: CaveParams {
                size: 4,
                frequency: 0.08,
            },
        },
        BiomeDef {
            name: "hills".into(),
            upper_bound: 1.0,
            heights: layered(32, 36, 2),
            lower_block: "stone".into(),
            mid_block: "dirt".into(),
            top_block: "grass".into(),
            trunk_block: default_trunk(),
            leaves_block: default_leaves(),
            trees: TreeParams {
                probability: 0.25,
                zoom: 0.9,
            },
            caves: CaveParams {
                size: 4,
                frequency: 0.06,
            },
        },
    ]
}
