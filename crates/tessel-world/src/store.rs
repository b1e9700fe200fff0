use std::error::Error;
use std::fmt;
use std::sync::{Arc, RwLock};

use hashbrown::HashMap;
use tessel_blocks::Block;
use tessel_chunk::{CHUNK_VOLUME, VoxelGrid, WorldPos};

use crate::terrain::TerrainGenerator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    NotFound,
    Corrupt(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "chunk not found"),
            LoadError::Corrupt(why) => write!(f, "corrupt chunk record: {why}"),
        }
    }
}

impl Error for LoadError {}

/// Persisted chunks keyed by world origin.
pub trait ChunkStore: Send + Sync {
    fn load(&self, origin: WorldPos) -> Result<VoxelGrid, LoadError>;
    /// Fire-and-forget; failures are the store's to report.
    fn save(&self, origin: WorldPos, voxels: Arc<VoxelGrid>);
}

/// Store that never has anything.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullStore;

impl ChunkStore for NullStore {
    fn load(&self, _origin: WorldPos) -> Result<VoxelGrid, LoadError> {
        Err(LoadError::NotFound)
    }

    fn save(&self, _origin: WorldPos, _voxels: Arc<VoxelGrid>) {}
}

/// In-process store holding raw block records.
#[derive(Default)]
pub struct MemoryChunkStore {
    records: RwLock<HashMap<WorldPos, Arc<[Block]>>>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores an arbitrary record, bypassing validation.
    pub fn insert_raw(&self, origin: WorldPos, blocks: Vec<Block>) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(origin, blocks.into());
    }
}

impl ChunkStore for MemoryChunkStore {
    fn load(&self, origin: WorldPos) -> Result<VoxelGrid, LoadError> {
        let rec = self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&origin)
            .cloned()
            .ok_or(LoadError::NotFound)?;
        if rec.len() != CHUNK_VOLUME {
            return Err(LoadError::Corrupt(format!(
                "expected {CHUNK_VOLUME} blocks, found {}",
                rec.len()
            )));
        }
        Ok(VoxelGrid::from_blocks(rec.to_vec()))
    }

    fn save(&self, origin: WorldPos, voxels: Arc<VoxelGrid>) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(origin, voxels.blocks().into());
    }
}

/// Loads a persisted chunk, falling back to fresh terrain when the record is
/// missing or unreadable. The flag reports whether the store supplied it.
pub fn load_or_generate(
    store: &dyn ChunkStore,
    terrain: &TerrainGenerator,
    origin: WorldPos,
) -> (VoxelGrid, bool) {
    match store.load(origin) {
        Ok(grid) => (grid, true),
        Err(LoadError::NotFound) => (terrain.generate(origin), false),
        Err(e) => {
            log::warn!(target: "store", "{origin:?}: {e}; regenerating");
            (terrain.generate(origin), false)
        }
    }
}
