use serde::{Deserialize, Serialize};

use crate::face::Face;
use crate::voxel::CHUNK_SIZE;

/// World-space block coordinate of a chunk's minimum corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Origin of the chunk adjacent across `face`.
    #[inline]
    pub fn neighbor(self, face: Face) -> Self {
        let (dx, dy, dz) = face.delta();
        let s = CHUNK_SIZE as i32;
        Self::new(self.x + dx * s, self.y + dy * s, self.z + dz * s)
    }

    #[inline]
    pub fn column(self) -> ColumnPos {
        ColumnPos::new(self.x, self.z)
    }
}

/// Grid slot of a chunk: `x`/`z` index the window, `y` indexes the column stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn step(self, face: Face) -> Self {
        let (dx, dy, dz) = face.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// World-space block coordinate of a column's minimum corner on the XZ plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnPos {
    pub x: i32,
    pub z: i32,
}

impl ColumnPos {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn offset_chunks(self, dx: i32, dz: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self::new(self.x + dx * s, self.z + dz * s)
    }

    /// Column containing the world block `(wx, wz)`.
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self::new(wx.div_euclid(s) * s, wz.div_euclid(s) * s)
    }
}
