//! Single-queue job runner used for bootstrap and draw requests.
//!
//! Every worker polls one FIFO. A noise-only job loads or generates the
//! chunk's voxels and counts the chunk down in its column; a full job also
//! lights the chunk and builds mesh and collider side by side.

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use tessel_chunk::{Chunk, Column, DrawingState};

use crate::config::SchedulerConfig;
use crate::context::JobContext;
use crate::job::{ChunkJob, JobKind, Priority};

const POLL: Duration = Duration::from_millis(10);

struct LegacyJob {
    job: Arc<ChunkJob>,
    only_noise: bool,
}

struct Shared {
    ctx: Arc<JobContext>,
    running: AtomicBool,
    jobs_rx: Receiver<LegacyJob>,
    finished_tx: Sender<Arc<ChunkJob>>,
    finished_len: AtomicUsize,
}

impl Shared {
    fn worker_loop(&self) {
        while self.running.load(Ordering::Acquire) {
            match self.jobs_rx.recv_timeout(POLL) {
                Ok(item) => self.process(item),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn process(&self, item: LegacyJob) {
        let LegacyJob { job, only_noise } = item;
        let ctx = self.ctx.as_ref();
        if !job.chunk().state().has_voxels() {
            ctx.run(JobKind::Noise, &job);
            ctx.run(JobKind::Structure, &job);
        } else if only_noise {
            if let Some(col) = job.column() {
                col.chunk_noise_done();
            }
        }
        if only_noise {
            return;
        }
        rayon::join(
            || ctx.run(JobKind::MeshBuild, &job),
            || ctx.run(JobKind::ReduceCollider, &job),
        );
        ctx.complete(&job);
        self.finished_len.fetch_add(1, Ordering::AcqRel);
        if self.finished_tx.send(job).is_err() {
            self.finished_len.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

pub struct LegacyJobManager {
    shared: Arc<Shared>,
    jobs_tx: Sender<LegacyJob>,
    finished_rx: Receiver<Arc<ChunkJob>>,
}

impl LegacyJobManager {
    pub fn start(ctx: Arc<JobContext>, cfg: &SchedulerConfig) -> Result<Self, Box<dyn Error>> {
        cfg.validate()?;
        let (jobs_tx, jobs_rx) = unbounded();
        let (finished_tx, finished_rx) = bounded(cfg.finished_capacity);
        let shared = Arc::new(Shared {
            ctx,
            running: AtomicBool::new(true),
            jobs_rx,
            finished_tx,
            finished_len: AtomicUsize::new(0),
        });
        let workers = cfg.worker_count();
        for i in 0..workers {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(format!("tessel-legacy-{i}"))
                .spawn(move || shared.worker_loop())?;
        }
        log::info!(target: "legacy", "started {workers} workers");
        Ok(Self {
            shared,
            jobs_tx,
            finished_rx,
        })
    }

    pub fn add(&self, chunk: Arc<Chunk>, only_noise: bool) -> Arc<ChunkJob> {
        let job = ChunkJob::new(chunk, Priority::Normal);
        let _ = self.jobs_tx.send(LegacyJob {
            job: Arc::clone(&job),
            only_noise,
        });
        job
    }

    /// Queues every chunk of `column`. Noise-only submissions put an
    /// unloaded column into the noise queue first.
    pub fn add_column(&self, column: &Column, only_noise: bool) {
        if only_noise && column.state() == DrawingState::Unloaded {
            column.begin_noise();
        }
        for chunk in column.chunks() {
            self.add(Arc::clone(chunk), only_noise);
        }
    }

    pub fn dequeue_finished_job(&self) -> Option<Arc<ChunkJob>> {
        let job = self.finished_rx.try_recv().ok()?;
        self.shared.finished_len.fetch_sub(1, Ordering::AcqRel);
        Some(job)
    }

    pub fn wait_finished_job(&self, timeout: Duration) -> Option<Arc<ChunkJob>> {
        let job = self.finished_rx.recv_timeout(timeout).ok()?;
        self.shared.finished_len.fetch_sub(1, Ordering::AcqRel);
        Some(job)
    }

    pub fn jobs_count(&self) -> usize {
        self.jobs_tx.len()
    }

    pub fn finished_jobs_count(&self) -> usize {
        self.shared.finished_len.load(Ordering::Acquire)
    }

    /// Workers exit at their next poll.
    pub fn shutdown(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            log::info!(target: "legacy", "shutdown requested");
        }
    }
}

impl Drop for LegacyJobManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
