use std::sync::Arc;

use tessel_blocks::Block;

use crate::face::Face;
use crate::voxel::{CHUNK_SIZE, VoxelGrid};

/// Immutable view of a chunk and its six face neighbours, indexed by
/// `Face::index()`. A `None` neighbour lies outside the resident window.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    pub center: Arc<VoxelGrid>,
    pub neighbors: [Option<Arc<VoxelGrid>>; 6],
}

impl Neighborhood {
    pub fn isolated(center: Arc<VoxelGrid>) -> Self {
        Self {
            center,
            neighbors: Default::default(),
        }
    }

    pub fn with_neighbor(mut self, face: Face, grid: Arc<VoxelGrid>) -> Self {
        self.neighbors[face.index()] = Some(grid);
        self
    }

    #[inline]
    pub fn neighbor(&self, face: Face) -> Option<&VoxelGrid> {
        self.neighbors[face.index()].as_deref()
    }

    /// Block at chunk-local coordinates which may step one cell outside the
    /// center along a single axis. `None` when that neighbour is missing.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if let Some(b) = self.center.get_i(x, y, z) {
            return Some(b);
        }
        let s = CHUNK_SIZE as i32;
        let outside = [x, y, z].iter().filter(|v| !(0..s).contains(*v)).count();
        if outside != 1 {
            return None;
        }
        let face = if z >= s {
            Face::Forward
        } else if z < 0 {
            Face::Back
        } else if y >= s {
            Face::Up
        } else if y < 0 {
            Face::Down
        } else if x < 0 {
            Face::Left
        } else {
            Face::Right
        };
        let n = self.neighbor(face)?;
        n.get_i(x.rem_euclid(s), y.rem_euclid(s), z.rem_euclid(s))
    }
}
