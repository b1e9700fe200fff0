use std::sync::Arc;

use tessel_blocks::Block;

use super::*;

#[test]
fn column_builds_stack_with_back_references() {
    let col = Column::new(ColumnPos::new(32, -16), (2, 0), -32, 32);
    assert_eq!(col.chunks().len(), 4);
    for (ly, c) in col.chunks().iter().enumerate() {
        assert_eq!(c.origin(), WorldPos::new(32, -32 + 16 * ly as i32, -16));
        assert_eq!(c.local(), LocalPos::new(2, ly as i32, 0));
        let owner = c.column().expect("column alive");
        assert!(Arc::ptr_eq(&owner, &col));
    }
}

#[test]
fn relabel_moves_every_chunk() {
    let col = Column::new(ColumnPos::new(0, 0), (1, 1), 0, 48);
    col.relabel(0, 4);
    assert_eq!(col.slot(), (0, 4));
    assert!(col.chunks().iter().all(|c| c.local().x == 0 && c.local().z == 4));
    assert_eq!(col.chunk(2).map(|c| c.local().y), Some(2));
}

#[test]
fn chunk_state_only_advances() {
    let c = Chunk::detached(WorldPos::default());
    assert!(c.advance(ChunkState::NoiseReady));
    assert!(!c.advance(ChunkState::NoiseQueued));
    assert_eq!(c.state(), ChunkState::NoiseReady);
    assert!(c.advance(ChunkState::Drawn));
    assert!(!c.advance(ChunkState::Generated));
    assert_eq!(c.state(), ChunkState::Drawn);
}

#[test]
fn dirty_flag_is_reentrant() {
    let c = Chunk::detached(WorldPos::default());
    c.advance(ChunkState::Drawn);
    c.mark_dirty();
    c.mark_dirty();
    assert!(c.take_dirty());
    assert!(!c.take_dirty());
    assert_eq!(c.state(), ChunkState::Drawn);
}

#[test]
fn set_block_copies_on_write() {
    let c = Chunk::detached(WorldPos::default());
    let before = c.snapshot();
    c.set_block(1, 2, 3, Block::new(4));
    assert!(before.is_all_air());
    assert_eq!(c.snapshot().get(1, 2, 3), Block::new(4));
    assert!(c.is_edited());
    assert!(c.is_dirty());
}

#[test]
fn column_noise_countdown() {
    let col = Column::new(ColumnPos::new(0, 0), (0, 0), 0, 48);
    col.begin_noise();
    assert_eq!(col.state(), DrawingState::InNoiseQueue);
    assert!(col.chunks().iter().all(|c| c.state() == ChunkState::NoiseQueued));
    assert!(!col.chunk_noise_done());
    assert!(!col.chunk_noise_done());
    assert!(col.chunk_noise_done());
    assert_eq!(col.state(), DrawingState::NoiseReady);
    assert!(!col.chunk_noise_done());
}

#[test]
fn column_dirty_requires_loaded_state() {
    let col = Column::new(ColumnPos::new(0, 0), (0, 0), 0, 16);
    col.begin_noise();
    col.mark_dirty();
    assert_eq!(col.state(), DrawingState::InNoiseQueue);
    col.set_state(DrawingState::Drawn);
    col.mark_dirty();
    assert_eq!(col.state(), DrawingState::Dirty);
}

#[test]
fn neighborhood_crosses_one_face() {
    let center = Arc::new(VoxelGrid::default());
    let mut up = VoxelGrid::default();
    up.set(3, 0, 5, Block::new(1));
    let nb = Neighborhood::isolated(center).with_neighbor(Face::Up, Arc::new(up));
    assert_eq!(nb.block_at(3, 16, 5), Some(Block::new(1)));
    assert_eq!(nb.block_at(3, 15, 5), Some(Block::AIR));
    assert_eq!(nb.block_at(-1, 4, 4), None);
    assert_eq!(nb.block_at(-1, 16, 4), None);
}

#[test]
fn face_opposites_cancel() {
    for f in Face::ALL {
        let (a, b, c) = f.delta();
        let (d, e, g) = f.opposite().delta();
        assert_eq!((a + d, b + e, c + g), (0, 0, 0));
        assert_eq!(Face::from_index(f.index()), f);
    }
}
