use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tessel_chunk::{Chunk, Column, Neighborhood};
use tessel_lighting::LightField;
use tessel_mesh_cpu::{ColliderData, MeshData};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    #[default]
    Normal,
    /// Jumps the mesh-stage queue, used after block edits.
    High,
}

/// One step of a chunk's pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    Noise,
    Structure,
    MeshBuild,
    ReduceCollider,
}

/// Work item and result record for one chunk.
///
/// Outputs are write-once: each step fills its own slot, so the two
/// parallel mesh-stage siblings never touch the same field.
#[derive(Debug)]
pub struct ChunkJob {
    chunk: Arc<Chunk>,
    priority: Priority,
    passes: AtomicU32,
    completed: AtomicBool,
    loaded: AtomicBool,
    snapshot: OnceLock<Neighborhood>,
    mesh: OnceLock<MeshData>,
    collider: OnceLock<ColliderData>,
    light: OnceLock<LightField>,
}

impl ChunkJob {
    pub fn new(chunk: Arc<Chunk>, priority: Priority) -> Arc<Self> {
        Arc::new(Self {
            chunk,
            priority,
            passes: AtomicU32::new(0),
            completed: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            snapshot: OnceLock::new(),
            mesh: OnceLock::new(),
            collider: OnceLock::new(),
            light: OnceLock::new(),
        })
    }

    #[inline]
    pub fn chunk(&self) -> &Arc<Chunk> {
        &self.chunk
    }

    pub fn column(&self) -> Option<Arc<Column>> {
        self.chunk.column()
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Number of steps executed so far.
    #[inline]
    pub fn pass_count(&self) -> u32 {
        self.passes.load(Ordering::Acquire)
    }

    pub(crate) fn bump_pass(&self) {
        self.passes.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_completed(&self) {
        self.completed.store(true, Ordering::Release);
    }

    /// Voxels came from the chunk store rather than the generator.
    #[inline]
    pub fn loaded_from_store(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub(crate) fn set_loaded(&self, v: bool) {
        self.loaded.store(v, Ordering::Release);
    }

    pub(crate) fn snapshot_or_init(&self, f: impl FnOnce() -> Neighborhood) -> &Neighborhood {
        self.snapshot.get_or_init(f)
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.get()
    }

    pub fn collider(&self) -> Option<&ColliderData> {
        self.collider.get()
    }

    pub fn light(&self) -> Option<&LightField> {
        self.light.get()
    }

    pub(crate) fn set_mesh(&self, m: MeshData) {
        let _ = self.mesh.set(m);
    }

    pub(crate) fn set_collider(&self, c: ColliderData) {
        let _ = self.collider.set(c);
    }

    pub(crate) fn set_light(&self, l: LightField) {
        let _ = self.light.set(l);
    }
}

/// A step bound to its chunk job.
#[derive(Debug)]
pub struct SubJob {
    pub kind: JobKind,
    pub job: Arc<ChunkJob>,
    finished: AtomicBool,
}

impl SubJob {
    pub fn new(kind: JobKind, job: Arc<ChunkJob>) -> Self {
        Self {
            kind,
            job,
            finished: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }
}

/// One pass item: steps run in order by the worker that dequeues it, and
/// steps fanned out to the mesh-stage lanes.
#[derive(Debug, Default)]
pub struct JobContainer {
    pub sequential: Vec<SubJob>,
    pub parallel: Vec<SubJob>,
}

impl JobContainer {
    pub fn sequential(steps: Vec<SubJob>) -> Self {
        Self {
            sequential: steps,
            parallel: Vec::new(),
        }
    }

    pub fn parallel(steps: Vec<SubJob>) -> Self {
        Self {
            sequential: Vec::new(),
            parallel: steps,
        }
    }
}

/// Parallel siblings of one container. The sibling that brings `remaining`
/// to zero observes every other sibling finished and owns the hand-off.
#[derive(Debug)]
pub(crate) struct Siblings {
    pub(crate) steps: Vec<SubJob>,
    remaining: AtomicUsize,
}

impl Siblings {
    pub(crate) fn new(steps: Vec<SubJob>) -> Arc<Self> {
        let n = steps.len();
        Arc::new(Self {
            steps,
            remaining: AtomicUsize::new(n),
        })
    }

    /// Records one sibling as done; true for the last one.
    pub(crate) fn finish_one(&self) -> bool {
        self.remaining.fetch_sub(1, Ordering::AcqRel) == 1
    }

    pub(crate) fn all_finished(&self) -> bool {
        self.steps.iter().all(SubJob::is_finished)
    }
}

/// Mesh-stage lane entry: one sibling of a group.
#[derive(Debug, Clone)]
pub(crate) struct ParallelTask {
    pub(crate) group: Arc<Siblings>,
    pub(crate) index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_chunk::WorldPos;

    #[test]
    fn last_sibling_owns_the_join() {
        let job = ChunkJob::new(Arc::new(Chunk::detached(WorldPos::new(0, 0, 0))), Priority::Normal);
        let group = Siblings::new(vec![
            SubJob::new(JobKind::MeshBuild, Arc::clone(&job)),
            SubJob::new(JobKind::ReduceCollider, Arc::clone(&job)),
        ]);
        group.steps[1].mark_finished();
        assert!(!group.finish_one());
        assert!(!group.all_finished());
        group.steps[0].mark_finished();
        assert!(group.finish_one());
        assert!(group.all_finished());
    }

    #[test]
    fn outputs_are_write_once() {
        let job = ChunkJob::new(Arc::new(Chunk::detached(WorldPos::new(0, 0, 0))), Priority::High);
        assert!(job.mesh().is_none());
        job.set_mesh(MeshData::default());
        let mut second = MeshData::default();
        second.idx.push(1);
        job.set_mesh(second);
        assert!(job.mesh().is_some_and(|m| m.idx.is_empty()));
        assert_eq!(job.priority(), Priority::High);
    }
}
