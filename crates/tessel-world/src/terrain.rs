use std::error::Error;
use std::sync::Arc;

use tessel_blocks::{Block, BlockRegistry};
use tessel_chunk::{CHUNK_SIZE, VoxelGrid, WorldPos};

use crate::biome::{BiomeClassifier, BiomeParams, BiomeTable};
use crate::config::WorldConfig;
use crate::noise::{FastNoiseSampler, NoiseSampler};

const TREE_SALT: i32 = 0x5EED_7EE;
const BIOME_SALT: i32 = 0x0B10_4E;
const TRUNK_HEIGHT: i32 = 6;

/// Layer heights and tree decision for one world XZ column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnProfile {
    pub lower: i32,
    pub mid: i32,
    pub top: i32,
    pub tree: bool,
}

/// Deterministic terrain: a pure function of world coordinates and seed.
pub struct TerrainGenerator {
    seed: i32,
    smoothness: f32,
    noise: Arc<dyn NoiseSampler>,
    biome_noise: Arc<dyn NoiseSampler>,
    classifier: Arc<dyn BiomeClassifier>,
}

impl TerrainGenerator {
    pub fn new(
        seed: i32,
        smoothness: f32,
        noise: Arc<dyn NoiseSampler>,
        biome_noise: Arc<dyn NoiseSampler>,
        classifier: Arc<dyn BiomeClassifier>,
    ) -> Self {
        Self {
            seed,
            smoothness,
            noise,
            biome_noise,
            classifier,
        }
    }

    pub fn from_config(cfg: &WorldConfig, reg: &BlockRegistry) -> Result<Self, Box<dyn Error>> {
        let table = BiomeTable::from_defs(&cfg.biomes, reg)?;
        Ok(Self::new(
            cfg.seed,
            cfg.smoothness,
            Arc::new(FastNoiseSampler::simplex_fractal(cfg.seed)),
            Arc::new(FastNoiseSampler::cellular(cfg.seed ^ BIOME_SALT)),
            Arc::new(table),
        ))
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Integer noise in `[0, max]`.
    #[inline]
    pub fn noise_i(&self, x: i32, y: i32, z: i32, scale: f32, max: i32) -> i32 {
        let n = self
            .noise
            .sample(self.seed, x as f32 * scale, y as f32 * scale, z as f32 * scale)
            .clamp(-1.0, 1.0);
        ((n + 1.0) * (max as f32 / 2.0)).floor() as i32
    }

    pub fn biome(&self, wx: i32, wz: i32) -> &BiomeParams {
        let s = self.smoothness;
        let n = self
            .biome_noise
            .sample(self.seed ^ BIOME_SALT, wx as f32 * s, 0.0, wz as f32 * s);
        self.classifier.classify(n)
    }

    pub fn column_profile(&self, wx: i32, wz: i32) -> ColumnProfile {
        self.profile_in(self.biome(wx, wz), wx, wz)
    }

    fn profile_in(&self, b: &BiomeParams, wx: i32, wz: i32) -> ColumnProfile {
        let h = &b.heights;
        let mut lower = h.lower_base
            + self.noise_i(wx, 0, wz, h.mountain_frequency, h.mountain_height);
        lower = lower.max(h.lower_min);
        lower += self.noise_i(wx, 0, wz, h.lower_noise_frequency, h.lower_noise_height);
        let mid = lower + h.mid_base + self.noise_i(wx, 5, wz, h.mid_noise_frequency, h.mid_noise_height);
        let top = mid + h.top_base + self.noise_i(wx, 10, wz, h.top_noise_frequency, h.top_noise_height);

        let zoom = b.trees.zoom;
        let t = self.noise.sample(
            self.seed.wrapping_add(TREE_SALT),
            wx as f32 * zoom,
            0.0,
            wz as f32 * zoom,
        );
        let tree_value = ((t + 1.0) * 0.5).clamp(0.0, 1.0);
        ColumnProfile {
            lower,
            mid,
            top,
            tree: b.trees.probability > 0.0 && tree_value > 1.0 - b.trees.probability,
        }
    }

    /// Layered terrain with caves for the chunk at `origin`.
    pub fn generate(&self, origin: WorldPos) -> VoxelGrid {
        let mut grid = VoxelGrid::default();
        let cs = CHUNK_SIZE as i32;
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let wx = origin.x + lx as i32;
                let wz = origin.z + lz as i32;
                let biome = self.biome(wx, wz);
                let p = self.profile_in(biome, wx, wz);
                if p.top < origin.y {
                    continue;
                }
                let caves = &biome.caves;
                for ly in 0..cs {
                    let wy = origin.y + ly;
                    if wy > p.top {
                        break;
                    }
                    let cave = self.noise_i(wx, wy, wz, caves.frequency, caves.size * 5);
                    if caves.size >= cave {
                        continue;
                    }
                    let id = if wy <= p.lower {
                        biome.lower_block
                    } else if wy <= p.mid {
                        biome.mid_block
                    } else {
                        biome.top_block
                    };
                    grid.set(lx, ly as usize, lz, Block::new(id));
                }
            }
        }
        grid
    }

    /// Places trees touching this chunk into air cells and returns the number
    /// of blocks written. Trees rooted in adjacent columns contribute their
    /// crowns, so every chunk computes its own share without reaching into
    /// neighbours.
    pub fn place_structures(&self, origin: WorldPos, grid: &mut VoxelGrid) -> usize {
        let cs = CHUNK_SIZE as i32;
        let mut trees = Vec::new();
        for lz in -1..=cs {
            for lx in -1..=cs {
                let wx = origin.x + lx;
                let wz = origin.z + lz;
                let biome = self.biome(wx, wz);
                let p = self.profile_in(biome, wx, wz);
                if p.tree {
                    trees.push((lx, lz, p.top, biome.trunk_block, biome.leaves_block));
                }
            }
        }

        let mut placed = 0;
        let mut put = |grid: &mut VoxelGrid, lx: i32, wy: i32, lz: i32, id| {
            let ly = wy - origin.y;
            if VoxelGrid::in_bounds(lx, ly, lz) {
                let (x, y, z) = (lx as usize, ly as usize, lz as usize);
                if grid.get(x, y, z).is_air() {
                    grid.set(x, y, z, Block::new(id));
                    placed += 1;
                }
            }
        };
        for &(lx, lz, top, trunk, _) in &trees {
            for wy in top + 1..=top + TRUNK_HEIGHT {
                put(grid, lx, wy, lz, trunk);
            }
        }
        for &(lx, lz, top, _, leaves) in &trees {
            let crown = top + TRUNK_HEIGHT;
            for wy in crown - 1..=crown {
                for dz in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dz != 0 {
                            put(grid, lx + dx, wy, lz + dz, leaves);
                        }
                    }
                }
            }
            put(grid, lx, crown + 1, lz, leaves);
        }
        placed
    }
}
