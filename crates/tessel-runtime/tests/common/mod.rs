#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tessel_blocks::BlockRegistry;
use tessel_chunk::ColumnPos;
use tessel_grid::Grid;
use tessel_lighting::DEFAULT_FALLOFF;
use tessel_runtime::{JobContext, SchedulerConfig};
use tessel_world::{ChunkStore, MemoryChunkStore, TerrainGenerator, WorldConfig};

pub const TIMEOUT: Duration = Duration::from_secs(20);

pub fn config() -> SchedulerConfig {
    SchedulerConfig {
        workers: Some(2),
        ..Default::default()
    }
}

pub fn context_with_store(
    draw_distance: usize,
    min_height: i32,
    max_height: i32,
    store: Arc<dyn ChunkStore>,
) -> Arc<JobContext> {
    let reg = Arc::new(BlockRegistry::builtin().unwrap());
    let world = WorldConfig::default();
    let terrain = Arc::new(TerrainGenerator::from_config(&world, &reg).unwrap());
    let grid = Arc::new(Grid::new(draw_distance, min_height, max_height, ColumnPos::new(0, 0)));
    Arc::new(JobContext::new(grid, reg, terrain, store, DEFAULT_FALLOFF))
}

pub fn context(draw_distance: usize, min_height: i32, max_height: i32) -> Arc<JobContext> {
    context_with_store(draw_distance, min_height, max_height, Arc::new(MemoryChunkStore::new()))
}

/// Polls `f` until it returns true or the deadline passes.
pub fn wait_until(mut f: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if f() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    f()
}
