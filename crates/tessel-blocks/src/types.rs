use serde::{Deserialize, Serialize};

pub type BlockId = u16;

/// One voxel cell. Id 0 is air.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
}

impl Block {
    pub const AIR: Block = Block { id: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub const fn is_air(self) -> bool {
        self.id == 0
    }
}
