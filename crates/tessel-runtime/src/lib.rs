//! Job orchestration: the staged pass scheduler, the FIFO legacy manager
//! and the per-tick streamer that ties both to the sliding grid.
#![forbid(unsafe_code)]

mod config;
mod context;
mod job;
mod legacy;
mod scheduler;
mod semaphore;
mod streaming;

pub use config::SchedulerConfig;
pub use context::JobContext;
pub use job::{ChunkJob, JobContainer, JobKind, Priority, SubJob};
pub use legacy::LegacyJobManager;
pub use scheduler::Scheduler;
pub use semaphore::Semaphore;
pub use streaming::{ChunkStreamer, ObserverEvent, VisualSink};
