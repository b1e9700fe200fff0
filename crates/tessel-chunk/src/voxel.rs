use tessel_blocks::Block;

pub const CHUNK_SIZE: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Dense 16³ voxel array of one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    blocks: Box<[Block]>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::filled(Block::AIR)
    }
}

impl VoxelGrid {
    pub fn filled(b: Block) -> Self {
        Self {
            blocks: vec![b; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Builds a grid from a linear block list; short input is padded with air.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        blocks.resize(CHUNK_VOLUME, Block::AIR);
        Self {
            blocks: blocks.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        let s = CHUNK_SIZE as i32;
        (0..s).contains(&x) && (0..s).contains(&y) && (0..s).contains(&z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn get_i(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if Self::in_bounds(x, y, z) {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, b: Block) {
        let i = Self::idx(x, y, z);
        self.blocks[i] = b;
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }
}
