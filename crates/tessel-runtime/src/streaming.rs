use std::error::Error;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use hashbrown::HashSet;
use tessel_blocks::Block;
use tessel_chunk::{CHUNK_SIZE, ChunkState, Column, ColumnPos, DrawingState, Face};
use tessel_grid::{Direction, Grid};

use crate::config::SchedulerConfig;
use crate::context::JobContext;
use crate::job::{ChunkJob, Priority};
use crate::legacy::LegacyJobManager;
use crate::scheduler::Scheduler;

/// Observer movement, in world units on the XZ plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObserverEvent {
    Moved { dx: f32, dz: f32 },
}

/// Receiver of finished geometry and of columns leaving the window.
pub trait VisualSink {
    fn upload(&mut self, job: &ChunkJob);
    fn release(&mut self, column: &Column);
}

/// Per-tick driver: turns observer movement into grid shifts, requests
/// draws for columns whose neighbourhood is ready and hands finished jobs
/// to the visual side.
pub struct ChunkStreamer {
    ctx: Arc<JobContext>,
    scheduler: Scheduler,
    legacy: LegacyJobManager,
    events: Receiver<ObserverEvent>,
    position: (f32, f32),
    awaiting_draw: HashSet<ColumnPos>,
}

impl ChunkStreamer {
    pub fn new(
        ctx: Arc<JobContext>,
        cfg: &SchedulerConfig,
        events: Receiver<ObserverEvent>,
    ) -> Result<Self, Box<dyn Error>> {
        let scheduler = Scheduler::start(Arc::clone(&ctx), cfg)?;
        let legacy = LegacyJobManager::start(Arc::clone(&ctx), cfg)?;
        let c = ctx.grid.center();
        let half = CHUNK_SIZE as f32 / 2.0;
        Ok(Self {
            ctx,
            scheduler,
            legacy,
            events,
            position: (c.x as f32 + half, c.z as f32 + half),
            awaiting_draw: HashSet::new(),
        })
    }

    #[inline]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.ctx.grid
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn legacy(&self) -> &LegacyJobManager {
        &self.legacy
    }

    #[inline]
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Queues noise for every resident column.
    pub fn bootstrap(&mut self) {
        let columns = self.grid().columns();
        for col in &columns {
            self.legacy.add_column(col, true);
            self.awaiting_draw.insert(col.origin());
        }
        log::info!(
            target: "stream",
            "bootstrap: {} columns, {} chunks",
            columns.len(),
            self.grid().chunks_in_total()
        );
    }

    /// Applies pending movement, shifting once per chunk boundary crossed.
    /// Returns the number of shifts.
    pub fn handle_events(&mut self, sink: &mut dyn VisualSink) -> usize {
        let mut shifts = 0;
        while let Ok(ObserverEvent::Moved { dx, dz }) = self.events.try_recv() {
            self.position.0 += dx;
            self.position.1 += dz;
            let target = ColumnPos::containing(self.position.0.floor() as i32, self.position.1.floor() as i32);
            loop {
                let c = self.grid().center();
                let dir = if target.x > c.x {
                    Direction::Right
                } else if target.x < c.x {
                    Direction::Left
                } else if target.z > c.z {
                    Direction::Forward
                } else if target.z < c.z {
                    Direction::Back
                } else {
                    break;
                };
                self.shift(dir, sink);
                shifts += 1;
            }
        }
        shifts
    }

    fn shift(&mut self, dir: Direction, sink: &mut dyn VisualSink) {
        let out = self.ctx.grid.shift(dir, &self.scheduler);
        for col in &out.evicted {
            self.awaiting_draw.remove(&col.origin());
            self.save_edits(col);
            sink.release(col);
        }
    }

    fn save_edits(&self, col: &Column) {
        for chunk in col.chunks().iter().filter(|c| c.is_edited()) {
            self.ctx.store.save(chunk.origin(), chunk.snapshot());
            log::debug!(target: "stream", "saved edited chunk {:?}", chunk.origin());
        }
    }

    /// Requests full builds for bootstrapped columns whose noise and whose
    /// neighbours' noise is ready. A column edited before its first draw is
    /// `Dirty` but still pending here. Returns the number of columns submitted.
    pub fn update(&mut self) -> usize {
        let mut submitted = 0;
        for col in self.grid().columns() {
            if !self.awaiting_draw.contains(&col.origin()) || !col.desired_for_visualization() {
                continue;
            }
            let cur = col.state();
            if !matches!(cur, DrawingState::NoiseReady | DrawingState::Dirty)
                || !self.grid().draw_eligible(&col)
            {
                continue;
            }
            if col.transition(cur, DrawingState::Drawn) {
                self.awaiting_draw.remove(&col.origin());
                self.legacy.add_column(&col, false);
                submitted += 1;
            }
        }
        submitted
    }

    /// Hands every finished job of a resident chunk to `sink`. Returns the
    /// number uploaded.
    pub fn drain_finished(&mut self, sink: &mut dyn VisualSink) -> usize {
        let mut uploaded = 0;
        while let Some(job) = self
            .scheduler
            .dequeue_finished_job()
            .or_else(|| self.legacy.dequeue_finished_job())
        {
            let Some(col) = job.column() else {
                continue;
            };
            if !self.grid().is_resident(&col) {
                continue;
            }
            sink.upload(&job);
            if job.chunk().state() >= ChunkState::Generated {
                job.chunk().advance(ChunkState::Drawn);
            }
            if col.state() != DrawingState::Drawn
                && col.desired_for_visualization()
                && col.all_chunks_at_least(ChunkState::Drawn)
                && self.grid().draw_eligible(&col)
            {
                col.set_state(DrawingState::Drawn);
            }
            uploaded += 1;
        }
        uploaded
    }

    /// One frame of the visual-update loop.
    pub fn tick(&mut self, sink: &mut dyn VisualSink) -> usize {
        self.handle_events(sink);
        self.update();
        self.drain_finished(sink)
    }

    /// Writes one block and queues the touched chunks for a mesh rebuild,
    /// the edited chunk on the priority lane. False when the position is
    /// not resident or its chunk has no voxels yet.
    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, b: Block) -> bool {
        let Some(col) = self.grid().column_at(ColumnPos::containing(wx, wz)) else {
            return false;
        };
        let cs = CHUNK_SIZE as i32;
        let Some(chunk) = col
            .chunks()
            .iter()
            .find(|c| (c.origin().y..c.origin().y + cs).contains(&wy))
        else {
            return false;
        };
        if !chunk.state().has_voxels() {
            return false;
        }
        let o = chunk.origin();
        let (lx, ly, lz) = (wx - o.x, wy - o.y, wz - o.z);
        chunk.set_block(lx as usize, ly as usize, lz as usize, b);
        self.scheduler.recalculate_chunk(Arc::clone(chunk), Priority::High);
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let (nx, ny, nz) = (lx + dx, ly + dy, lz + dz);
            let inside = [nx, ny, nz].iter().all(|v| (0..cs).contains(v));
            if inside {
                continue;
            }
            if let Some(n) = self.grid().get_chunk(chunk.local().step(face)) {
                if n.state().has_voxels() {
                    n.mark_dirty();
                    self.scheduler.recalculate_chunk(n, Priority::Normal);
                }
            }
        }
        true
    }

    /// Stops both job runners and saves edited resident chunks.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        self.legacy.shutdown();
        for col in self.grid().columns() {
            self.save_edits(&col);
        }
    }
}
