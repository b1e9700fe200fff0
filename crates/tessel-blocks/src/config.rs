use serde::Deserialize;

/// Top-level shape of a block definition file.
#[derive(Deserialize, Debug, Clone)]
pub struct BlocksConfig {
    #[serde(default)]
    pub atlas: AtlasDef,
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct AtlasDef {
    /// Tiles per atlas side.
    #[serde(default = "default_tiles")]
    pub tiles: u32,
}

impl Default for AtlasDef {
    fn default() -> Self {
        Self {
            tiles: default_tiles(),
        }
    }
}

fn default_tiles() -> u32 {
    16
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub transparent: Option<bool>,
    /// Fraction of the incoming light ray that passes through the block.
    #[serde(default)]
    pub transparency: Option<f32>,
    /// Inset applied to faces of transparent blocks.
    #[serde(default)]
    pub mesh_offset: Option<f32>,
    #[serde(default)]
    pub uv: Option<UvDef>,
}

/// Atlas tile coordinates, either one tile for all faces or split by role.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UvDef {
    #[serde(default)]
    pub all: Option<[u32; 2]>,
    #[serde(default)]
    pub top: Option<[u32; 2]>,
    #[serde(default)]
    pub bottom: Option<[u32; 2]>,
    #[serde(default)]
    pub side: Option<[u32; 2]>,
}
