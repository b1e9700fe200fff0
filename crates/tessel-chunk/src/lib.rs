//! Chunk storage, column stacks and their readiness states.
#![forbid(unsafe_code)]

mod chunk;
mod column;
mod coords;
mod face;
mod neighborhood;
mod state;
mod voxel;

pub use chunk::Chunk;
pub use column::Column;
pub use coords::{ColumnPos, LocalPos, WorldPos};
pub use face::Face;
pub use neighborhood::Neighborhood;
pub use state::{ChunkState, DrawingState};
pub use voxel::{CHUNK_SIZE, CHUNK_VOLUME, VoxelGrid};

#[cfg(test)]
mod tests;
