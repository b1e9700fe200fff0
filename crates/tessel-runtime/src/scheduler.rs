//! Staged job scheduler.
//!
//! Column submissions are split per chunk into three passes that run in
//! strict order: noise, structure, mesh. A pass is consumed only after all
//! of its items were taken and every taken item returned. Mesh-stage pass
//! items fan out into two parallel siblings (mesh build and collider
//! reduction) that run from the mesh lanes; the sibling finishing last
//! hands the chunk job to the finished queue.
//!
//! Workers block on one counting semaphore. Arming a pass releases one
//! permit per item plus one extra so that a worker can notice an empty
//! pass and advance past it; every lane entry releases one permit.

use std::collections::VecDeque;
use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tessel_chunk::{Chunk, Column, DrawingState};
use tessel_grid::JobSink;

use crate::config::SchedulerConfig;
use crate::context::JobContext;
use crate::job::{ChunkJob, JobContainer, JobKind, ParallelTask, Priority, Siblings, SubJob};
use crate::semaphore::Semaphore;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    Noise,
    Structure,
    Mesh,
}

#[derive(Debug)]
struct Pass {
    stage: Stage,
    items: VecDeque<JobContainer>,
    in_flight: usize,
}

impl Pass {
    fn new(stage: Stage, items: VecDeque<JobContainer>) -> Self {
        Self {
            stage,
            items,
            in_flight: 0,
        }
    }
}

/// Submissions collected between `pass_begin` and `pass_end`.
#[derive(Debug, Default)]
struct OpenBatch {
    noise: VecDeque<JobContainer>,
    structure: VecDeque<JobContainer>,
    mesh: VecDeque<JobContainer>,
}

struct Shared {
    ctx: Arc<JobContext>,
    running: AtomicBool,
    signal: Semaphore,
    passes: Mutex<VecDeque<Pass>>,
    open: Mutex<Option<OpenBatch>>,
    mesh_tx: Sender<ParallelTask>,
    mesh_rx: Receiver<ParallelTask>,
    priority_tx: Sender<ParallelTask>,
    priority_rx: Receiver<ParallelTask>,
    finished_tx: Sender<Arc<ChunkJob>>,
    finished_len: AtomicUsize,
    mesh_batch: usize,
}

impl Shared {
    fn passes(&self) -> MutexGuard<'_, VecDeque<Pass>> {
        self.passes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn worker_loop(&self, id: usize) {
        log::debug!(target: "scheduler", "worker {id} started");
        while self.running.load(Ordering::Acquire) {
            self.signal.acquire();
            if !self.running.load(Ordering::Acquire) {
                break;
            }
            if let Some(item) = self.take_pass_item() {
                self.run_container(item);
                self.finish_pass_item();
            }
            self.drain_mesh_lanes();
        }
        log::debug!(target: "scheduler", "worker {id} exiting");
    }

    fn take_pass_item(&self) -> Option<JobContainer> {
        let mut passes = self.passes();
        let front = passes.front_mut()?;
        if let Some(item) = front.items.pop_front() {
            front.in_flight += 1;
            return Some(item);
        }
        if front.in_flight == 0 {
            self.advance(&mut passes);
        }
        None
    }

    fn finish_pass_item(&self) {
        let mut passes = self.passes();
        let Some(front) = passes.front_mut() else {
            return;
        };
        front.in_flight = front.in_flight.saturating_sub(1);
        if front.items.is_empty() && front.in_flight == 0 {
            self.advance(&mut passes);
        }
    }

    /// Drops the drained front pass and arms the next one.
    fn advance(&self, passes: &mut VecDeque<Pass>) {
        if let Some(done) = passes.pop_front() {
            log::debug!(target: "scheduler", "{:?} pass drained", done.stage);
        }
        if let Some(next) = passes.front() {
            log::debug!(target: "scheduler", "{:?} pass armed with {} items", next.stage, next.items.len());
            self.signal.release(next.items.len() + 1);
        }
    }

    fn run_container(&self, item: JobContainer) {
        let JobContainer { sequential, parallel } = item;
        for step in &sequential {
            self.ctx.run(step.kind, &step.job);
            step.mark_finished();
        }
        if !parallel.is_empty() {
            self.schedule_group(Siblings::new(parallel), Priority::Normal);
        }
    }

    fn schedule_group(&self, group: Arc<Siblings>, priority: Priority) {
        for index in 0..group.steps.len() {
            let task = ParallelTask {
                group: Arc::clone(&group),
                index,
            };
            let lane = match priority {
                Priority::Normal => &self.mesh_tx,
                Priority::High => &self.priority_tx,
            };
            if lane.send(task).is_ok() {
                self.signal.release(1);
            }
        }
    }

    fn drain_mesh_lanes(&self) {
        for _ in 0..self.mesh_batch {
            let task = match self.priority_rx.try_recv() {
                Ok(t) => t,
                Err(_) => match self.mesh_rx.try_recv() {
                    Ok(t) => t,
                    Err(_) => break,
                },
            };
            self.run_parallel(task);
        }
    }

    fn run_parallel(&self, task: ParallelTask) {
        let step = &task.group.steps[task.index];
        if !step.is_finished() {
            self.ctx.run(step.kind, &step.job);
            step.mark_finished();
        }
        if task.group.finish_one() {
            debug_assert!(task.group.all_finished());
            let job = Arc::clone(&step.job);
            self.ctx.complete(&job);
            self.finished_len.fetch_add(1, Ordering::AcqRel);
            if self.finished_tx.send(job).is_err() {
                self.finished_len.fetch_sub(1, Ordering::AcqRel);
                log::debug!(target: "scheduler", "finished queue closed; dropping result");
            }
        }
    }
}

/// Fixed worker pool executing noise, structure and mesh passes.
pub struct Scheduler {
    shared: Arc<Shared>,
    finished_rx: Receiver<Arc<ChunkJob>>,
    workers: usize,
    _pool: ThreadPool,
}

impl Scheduler {
    /// Spawns the workers. They idle until the first `pass_end` or
    /// `recalculate_chunk`.
    pub fn start(ctx: Arc<JobContext>, cfg: &SchedulerConfig) -> Result<Self, Box<dyn Error>> {
        cfg.validate()?;
        let workers = cfg.worker_count();
        let (mesh_tx, mesh_rx) = unbounded();
        let (priority_tx, priority_rx) = unbounded();
        let (finished_tx, finished_rx) = bounded(cfg.finished_capacity);
        let shared = Arc::new(Shared {
            ctx,
            running: AtomicBool::new(true),
            signal: Semaphore::new(0),
            passes: Mutex::new(VecDeque::new()),
            open: Mutex::new(None),
            mesh_tx,
            mesh_rx,
            priority_tx,
            priority_rx,
            finished_tx,
            finished_len: AtomicUsize::new(0),
            mesh_batch: cfg.mesh_batch,
        });
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("tessel-sched-{i}"))
            .build()?;
        for id in 0..workers {
            let shared = Arc::clone(&shared);
            pool.spawn(move || shared.worker_loop(id));
        }
        log::info!(target: "scheduler", "started {workers} workers, mesh batch {}", cfg.mesh_batch);
        Ok(Self {
            shared,
            finished_rx,
            workers,
            _pool: pool,
        })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Opens a submission window.
    ///
    /// # Panics
    /// If a window is already open.
    pub fn pass_begin(&self) {
        let mut open = self.shared.open.lock().unwrap_or_else(|e| e.into_inner());
        if open.is_some() {
            panic!("pass_begin called while a pass is already open");
        }
        *open = Some(OpenBatch::default());
    }

    /// Splits `column` into per-chunk steps of the open window. Without
    /// `run_with_noise` only structure and mesh steps are queued.
    pub fn add(&self, column: Arc<Column>, run_with_noise: bool) {
        let mut open = self.shared.open.lock().unwrap_or_else(|e| e.into_inner());
        let Some(batch) = open.as_mut() else {
            log::warn!(target: "scheduler", "add({:?}) outside pass_begin/pass_end ignored", column.origin());
            return;
        };
        if run_with_noise && column.state() == DrawingState::Unloaded {
            column.begin_noise();
        }
        for chunk in column.chunks() {
            let job = ChunkJob::new(Arc::clone(chunk), Priority::Normal);
            if run_with_noise {
                batch
                    .noise
                    .push_back(JobContainer::sequential(vec![SubJob::new(JobKind::Noise, Arc::clone(&job))]));
            }
            batch
                .structure
                .push_back(JobContainer::sequential(vec![SubJob::new(JobKind::Structure, Arc::clone(&job))]));
            batch.mesh.push_back(JobContainer::parallel(vec![
                SubJob::new(JobKind::MeshBuild, Arc::clone(&job)),
                SubJob::new(JobKind::ReduceCollider, job),
            ]));
        }
    }

    /// Closes the window and queues its passes behind any still running.
    ///
    /// # Panics
    /// If no window is open.
    pub fn pass_end(&self) {
        let batch = {
            let mut open = self.shared.open.lock().unwrap_or_else(|e| e.into_inner());
            match open.take() {
                Some(b) => b,
                None => panic!("pass_end called without an open pass"),
            }
        };
        log::debug!(
            target: "scheduler",
            "pass end: noise {} structure {} mesh {}",
            batch.noise.len(),
            batch.structure.len(),
            batch.mesh.len()
        );
        let mut passes = self.shared.passes();
        let idle = passes.is_empty();
        passes.push_back(Pass::new(Stage::Noise, batch.noise));
        passes.push_back(Pass::new(Stage::Structure, batch.structure));
        passes.push_back(Pass::new(Stage::Mesh, batch.mesh));
        if idle {
            let n = passes.front().map_or(0, |p| p.items.len());
            self.shared.signal.release(n + 1);
        }
    }

    /// Queues a mesh-only rebuild of `chunk` straight into the mesh stage.
    pub fn recalculate_chunk(&self, chunk: Arc<Chunk>, priority: Priority) {
        if let Some(col) = chunk.column() {
            col.mark_dirty();
        }
        let job = ChunkJob::new(chunk, priority);
        let group = Siblings::new(vec![
            SubJob::new(JobKind::MeshBuild, Arc::clone(&job)),
            SubJob::new(JobKind::ReduceCollider, job),
        ]);
        self.shared.schedule_group(group, priority);
    }

    /// Next completed job, or `None` when nothing is ready.
    pub fn dequeue_finished_job(&self) -> Option<Arc<ChunkJob>> {
        let job = self.finished_rx.try_recv().ok()?;
        self.shared.finished_len.fetch_sub(1, Ordering::AcqRel);
        Some(job)
    }

    /// Like `dequeue_finished_job` but waits up to `timeout`.
    pub fn wait_finished_job(&self, timeout: Duration) -> Option<Arc<ChunkJob>> {
        let job = self.finished_rx.recv_timeout(timeout).ok()?;
        self.shared.finished_len.fetch_sub(1, Ordering::AcqRel);
        Some(job)
    }

    pub fn finished_jobs_count(&self) -> usize {
        self.shared.finished_len.load(Ordering::Acquire)
    }

    /// Items still waiting in the current pass.
    pub fn pass_items_pending(&self) -> usize {
        self.shared.passes().front().map_or(0, |p| p.items.len())
    }

    pub fn mesh_jobs_count(&self) -> usize {
        self.shared.mesh_rx.len() + self.shared.priority_rx.len()
    }

    /// True when no pass is queued and both mesh lanes are empty. Results
    /// may still be executing.
    pub fn is_idle(&self) -> bool {
        self.shared.passes().is_empty() && self.mesh_jobs_count() == 0
    }

    /// Stops the workers after their current item.
    pub fn shutdown(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            self.shared.signal.release(self.workers);
            log::info!(target: "scheduler", "shutdown requested");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl JobSink for Scheduler {
    fn pass_begin(&self) {
        Scheduler::pass_begin(self);
    }

    fn add(&self, column: Arc<Column>, run_with_noise: bool) {
        Scheduler::add(self, column, run_with_noise);
    }

    fn pass_end(&self) {
        Scheduler::pass_end(self);
    }
}
