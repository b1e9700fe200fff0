use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::chunk::Chunk;
use crate::coords::{ColumnPos, LocalPos, WorldPos};
use crate::state::{ChunkState, DrawingState};
use crate::voxel::CHUNK_SIZE;

/// Vertical stack of chunks sharing one grid slot.
#[derive(Debug)]
pub struct Column {
    origin: ColumnPos,
    slot: RwLock<(i32, i32)>,
    chunks: Vec<Arc<Chunk>>,
    state: AtomicU8,
    desired: AtomicBool,
    noise_pending: AtomicUsize,
}

impl Column {
    /// Creates the column and its chunks from `min_height` up to `max_height`.
    pub fn new(origin: ColumnPos, slot: (i32, i32), min_height: i32, max_height: i32) -> Arc<Self> {
        Arc::new_cyclic(|weak| {
            let chunks = (min_height..max_height)
                .step_by(CHUNK_SIZE)
                .enumerate()
                .map(|(ly, h)| {
                    Arc::new(Chunk::new(
                        WorldPos::new(origin.x, h, origin.z),
                        LocalPos::new(slot.0, ly as i32, slot.1),
                        weak.clone(),
                    ))
                })
                .collect();
            Column {
                origin,
                slot: RwLock::new(slot),
                chunks,
                state: AtomicU8::new(DrawingState::Unloaded as u8),
                desired: AtomicBool::new(false),
                noise_pending: AtomicUsize::new(0),
            }
        })
    }

    #[inline]
    pub fn origin(&self) -> ColumnPos {
        self.origin
    }

    #[inline]
    pub fn slot(&self) -> (i32, i32) {
        *self.slot.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Moves the column and all of its chunks to grid slot `(x, z)`.
    pub fn relabel(&self, x: i32, z: i32) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = (x, z);
        for (ly, c) in self.chunks.iter().enumerate() {
            c.set_local(LocalPos::new(x, ly as i32, z));
        }
    }

    #[inline]
    pub fn chunks(&self) -> &[Arc<Chunk>] {
        &self.chunks
    }

    #[inline]
    pub fn chunk(&self, ly: usize) -> Option<&Arc<Chunk>> {
        self.chunks.get(ly)
    }

    #[inline]
    pub fn state(&self) -> DrawingState {
        DrawingState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_state(&self, s: DrawingState) {
        self.state.store(s as u8, Ordering::Release);
    }

    /// Atomically moves from `from` to `to`; false if the state was not `from`.
    pub fn transition(&self, from: DrawingState, to: DrawingState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Flags a loaded column for a mesh-only rebuild. Columns still waiting
    /// for noise keep their state.
    pub fn mark_dirty(&self) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                DrawingState::from_u8(cur)
                    .at_least_noise_ready()
                    .then_some(DrawingState::Dirty as u8)
            });
    }

    #[inline]
    pub fn desired_for_visualization(&self) -> bool {
        self.desired.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_desired_for_visualization(&self, v: bool) {
        self.desired.store(v, Ordering::Release);
    }

    /// Queues every chunk for noise. The column becomes `NoiseReady` once
    /// each chunk has reported through `chunk_noise_done`.
    pub fn begin_noise(&self) {
        self.noise_pending.store(self.chunks.len(), Ordering::Release);
        self.set_state(DrawingState::InNoiseQueue);
        for c in &self.chunks {
            c.advance(ChunkState::NoiseQueued);
        }
    }

    /// Returns true for the call that completed the column.
    pub fn chunk_noise_done(&self) -> bool {
        let prev = self
            .noise_pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match prev {
            Ok(1) => self.transition(DrawingState::InNoiseQueue, DrawingState::NoiseReady),
            _ => false,
        }
    }

    pub fn all_chunks_at_least(&self, s: ChunkState) -> bool {
        self.chunks.iter().all(|c| c.state() >= s)
    }
}
