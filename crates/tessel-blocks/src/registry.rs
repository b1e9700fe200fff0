use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlocksConfig, UvDef};
use super::types::{Block, BlockId};

const DEFAULT_BLOCKS: &str = include_str!("../assets/blocks.toml");

// Face order shared with the mesher: Forward, Back, Up, Down, Left, Right.
const FACE_UP: usize = 2;
const FACE_DOWN: usize = 3;

/// Normalized atlas rectangle for one face.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    /// Participates in collision.
    pub solid: bool,
    /// Does not hide neighbouring faces; drawn into the transparent index list.
    pub transparent: bool,
    pub transparency: f32,
    pub mesh_offset: f32,
    pub uv: [UvRect; 6],
}

impl BlockType {
    fn unknown(id: BlockId) -> Self {
        Self {
            id,
            name: "unknown".into(),
            solid: true,
            transparent: false,
            transparency: 0.0,
            mesh_offset: 0.0,
            uv: [UvRect::default(); 6],
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<Option<BlockType>>,
    pub by_name: HashMap<String, BlockId>,
    unknown: BlockType,
}

impl BlockRegistry {
    /// Registry built from the block table bundled with the crate.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(DEFAULT_BLOCKS)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(s)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        if cfg.atlas.tiles == 0 {
            return Err("atlas.tiles must be positive".into());
        }
        let tile = 1.0 / cfg.atlas.tiles as f32;
        let mut reg = BlockRegistry {
            blocks: Vec::new(),
            by_name: HashMap::new(),
            unknown: BlockType::unknown(BlockId::MAX),
        };
        for (n, def) in cfg.blocks.into_iter().enumerate() {
            let id = def.id.unwrap_or(n as BlockId);
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name '{}'", def.name).into());
            }
            if reg.get(id).is_some() {
                return Err(format!("duplicate block id {id} ('{}')", def.name).into());
            }
            let air = id == 0;
            let transparent = def.transparent.unwrap_or(air);
            let transparency = def
                .transparency
                .unwrap_or(if transparent { 1.0 } else { 0.0 });
            if !(0.0..=1.0).contains(&transparency) {
                return Err(format!("block '{}': transparency must be in [0, 1]", def.name).into());
            }
            let ty = BlockType {
                id,
                solid: def.solid.unwrap_or(!air),
                transparent,
                transparency,
                mesh_offset: def.mesh_offset.unwrap_or(0.0),
                uv: compile_uv(def.uv.as_ref(), tile),
                name: def.name,
            };
            let slot = id as usize;
            if reg.blocks.len() <= slot {
                reg.blocks.resize(slot + 1, None);
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[slot] = Some(ty);
        }
        if reg.get(0).is_none() {
            return Err("block id 0 must be defined as air".into());
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(|b| b.as_ref())
    }

    /// Lookup that falls back to an opaque solid placeholder for unregistered ids.
    #[inline]
    pub fn ty(&self, b: Block) -> &BlockType {
        self.get(b.id).unwrap_or(&self.unknown)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Block by name, air when unknown.
    pub fn block(&self, name: &str) -> Block {
        Block::new(self.id_by_name(name).unwrap_or(0))
    }

    #[inline]
    pub fn is_transparent(&self, b: Block) -> bool {
        self.ty(b).transparent
    }

    #[inline]
    pub fn is_solid(&self, b: Block) -> bool {
        self.ty(b).solid
    }

    /// Non-air and not see-through: hides the neighbouring face.
    #[inline]
    pub fn is_opaque(&self, b: Block) -> bool {
        !b.is_air() && !self.ty(b).transparent
    }

    #[inline]
    pub fn transparency(&self, b: Block) -> f32 {
        if b.is_air() { 1.0 } else { self.ty(b).transparency }
    }

    #[inline]
    pub fn mesh_offset(&self, b: Block) -> f32 {
        self.ty(b).mesh_offset
    }

    #[inline]
    pub fn uv(&self, b: Block, face: usize) -> UvRect {
        self.ty(b).uv[face]
    }
}

fn compile_uv(def: Option<&UvDef>, tile: f32) -> [UvRect; 6] {
    let Some(def) = def else {
        return [UvRect::default(); 6];
    };
    let rect = |t: Option<[u32; 2]>| {
        t.map(|[tx, ty]| UvRect {
            x: tx as f32 * tile,
            y: ty as f32 * tile,
            w: tile,
            h: tile,
        })
    };
    let all = rect(def.all).unwrap_or_default();
    let side = rect(def.side).unwrap_or(all);
    let mut out = [side; 6];
    out[FACE_UP] = rect(def.top).unwrap_or(all);
    out[FACE_DOWN] = rect(def.bottom).unwrap_or(all);
    out
}
