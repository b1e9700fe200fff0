/// Per-chunk pipeline progress. Only ever advances; re-meshing after an
/// edit is tracked by the chunk's separate dirty flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ChunkState {
    Unloaded = 0,
    NoiseQueued = 1,
    NoiseReady = 2,
    Generated = 3,
    Drawn = 4,
}

impl ChunkState {
    #[inline]
    pub fn from_u8(v: u8) -> ChunkState {
        match v {
            1 => ChunkState::NoiseQueued,
            2 => ChunkState::NoiseReady,
            3 => ChunkState::Generated,
            4 => ChunkState::Drawn,
            _ => ChunkState::Unloaded,
        }
    }

    #[inline]
    pub fn has_voxels(self) -> bool {
        self >= ChunkState::NoiseReady
    }
}

/// Column-level readiness gating visualization.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DrawingState {
    Unloaded = 0,
    InNoiseQueue = 1,
    NoiseReady = 2,
    Dirty = 3,
    Drawn = 4,
}

impl DrawingState {
    #[inline]
    pub fn from_u8(v: u8) -> DrawingState {
        match v {
            1 => DrawingState::InNoiseQueue,
            2 => DrawingState::NoiseReady,
            3 => DrawingState::Dirty,
            4 => DrawingState::Drawn,
            _ => DrawingState::Unloaded,
        }
    }

    /// Voxel data is final enough for neighbours to mesh and light against.
    #[inline]
    pub fn at_least_noise_ready(self) -> bool {
        self >= DrawingState::NoiseReady
    }
}
