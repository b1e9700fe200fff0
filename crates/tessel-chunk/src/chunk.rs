use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tessel_blocks::Block;

use crate::column::Column;
use crate::coords::{LocalPos, WorldPos};
use crate::state::ChunkState;
use crate::voxel::VoxelGrid;

/// One 16³ cell of a column.
///
/// Voxels are published as immutable snapshots: a job reads `snapshot()`,
/// builds a new grid and hands it back with `publish()`. Which job may
/// publish is decided by pass ordering in the scheduler; the lock only
/// protects the pointer swap.
#[derive(Debug)]
pub struct Chunk {
    origin: WorldPos,
    local: RwLock<LocalPos>,
    voxels: RwLock<Arc<VoxelGrid>>,
    state: AtomicU8,
    dirty: AtomicBool,
    edited: AtomicBool,
    column: Weak<Column>,
}

impl Chunk {
    pub fn new(origin: WorldPos, local: LocalPos, column: Weak<Column>) -> Self {
        Self {
            origin,
            local: RwLock::new(local),
            voxels: RwLock::new(Arc::new(VoxelGrid::default())),
            state: AtomicU8::new(ChunkState::Unloaded as u8),
            dirty: AtomicBool::new(false),
            edited: AtomicBool::new(false),
            column,
        }
    }

    /// Chunk with no owning column, used by tools and tests.
    pub fn detached(origin: WorldPos) -> Self {
        Self::new(origin, LocalPos::default(), Weak::new())
    }

    #[inline]
    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    #[inline]
    pub fn local(&self) -> LocalPos {
        *self.local.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_local(&self, p: LocalPos) {
        *self.local.write().unwrap_or_else(|e| e.into_inner()) = p;
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<VoxelGrid> {
        Arc::clone(&self.voxels.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn publish(&self, grid: VoxelGrid) {
        self.publish_arc(Arc::new(grid));
    }

    pub fn publish_arc(&self, grid: Arc<VoxelGrid>) {
        *self.voxels.write().unwrap_or_else(|e| e.into_inner()) = grid;
    }

    /// Copy-on-write single block edit. Marks the chunk edited and dirty.
    pub fn set_block(&self, x: usize, y: usize, z: usize, b: Block) {
        let mut guard = self.voxels.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut guard).set(x, y, z, b);
        drop(guard);
        self.edited.store(true, Ordering::Release);
        self.mark_dirty();
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves the state forward to `to`. Returns false when the chunk is
    /// already at or past it.
    pub fn advance(&self, to: ChunkState) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                (cur < to as u8).then_some(to as u8)
            })
            .is_ok()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    #[inline]
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears the dirty flag, returning whether it was set.
    #[inline]
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Voxels differ from what generation would produce.
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited.load(Ordering::Acquire)
    }

    #[inline]
    pub fn column(&self) -> Option<Arc<Column>> {
        self.column.upgrade()
    }
}
