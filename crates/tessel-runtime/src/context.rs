use std::sync::Arc;
use std::time::Instant;

use tessel_blocks::BlockRegistry;
use tessel_chunk::{ChunkState, VoxelGrid};
use tessel_grid::Grid;
use tessel_lighting::compute_light;
use tessel_mesh_cpu::{build_chunk_mesh, reduce_collider};
use tessel_world::{ChunkStore, TerrainGenerator, load_or_generate};

use crate::job::{ChunkJob, JobKind};

/// Everything a job step reads besides its own chunk.
pub struct JobContext {
    pub grid: Arc<Grid>,
    pub registry: Arc<BlockRegistry>,
    pub terrain: Arc<TerrainGenerator>,
    pub store: Arc<dyn ChunkStore>,
    pub falloff: f32,
}

impl JobContext {
    pub fn new(
        grid: Arc<Grid>,
        registry: Arc<BlockRegistry>,
        terrain: Arc<TerrainGenerator>,
        store: Arc<dyn ChunkStore>,
        falloff: f32,
    ) -> Self {
        Self {
            grid,
            registry,
            terrain,
            store,
            falloff,
        }
    }

    /// Single dispatcher for every step kind.
    pub fn run(&self, kind: JobKind, job: &ChunkJob) {
        let t0 = Instant::now();
        match kind {
            JobKind::Noise => self.noise(job),
            JobKind::Structure => self.structure(job),
            JobKind::MeshBuild => self.mesh(job),
            JobKind::ReduceCollider => self.collider(job),
        }
        job.bump_pass();
        log::trace!(
            target: "jobs",
            "{:?} {:?} in {}us",
            kind,
            job.chunk().origin(),
            t0.elapsed().as_micros()
        );
    }

    /// Loads or generates the chunk's voxels and marks them `NoiseReady`.
    fn noise(&self, job: &ChunkJob) {
        let chunk = job.chunk();
        let (voxels, loaded) = load_or_generate(self.store.as_ref(), &self.terrain, chunk.origin());
        job.set_loaded(loaded);
        chunk.publish(voxels);
        chunk.advance(ChunkState::NoiseReady);
    }

    /// Adds trees on top of voxels this job just generated, then reports the
    /// chunk to its column. A structure step that did not follow a noise
    /// step of the same job leaves the chunk alone; so do stored and edited
    /// chunks.
    fn structure(&self, job: &ChunkJob) {
        if job.pass_count() == 0 {
            return;
        }
        let chunk = job.chunk();
        let fresh = chunk.state() == ChunkState::NoiseReady && !job.loaded_from_store() && !chunk.is_edited();
        if fresh {
            let mut voxels = VoxelGrid::clone(&chunk.snapshot());
            if self.terrain.place_structures(chunk.origin(), &mut voxels) > 0 {
                chunk.publish(voxels);
            }
        }
        if let Some(col) = chunk.column() {
            if col.chunk_noise_done() {
                log::debug!(target: "jobs", "column {:?} noise ready", col.origin());
            }
        }
    }

    /// Computes the light field and the render mesh.
    fn mesh(&self, job: &ChunkJob) {
        let chunk = job.chunk();
        chunk.take_dirty();
        let nb = job.snapshot_or_init(|| self.grid.neighborhood(chunk));
        let light = compute_light(nb, &self.registry, self.falloff);
        job.set_mesh(build_chunk_mesh(nb, &self.registry, Some(&light)));
        job.set_light(light);
    }

    fn collider(&self, job: &ChunkJob) {
        let chunk = job.chunk();
        let nb = job.snapshot_or_init(|| self.grid.neighborhood(chunk));
        job.set_collider(reduce_collider(nb, &self.registry));
    }

    /// Marks the job's outputs final. A chunk still waiting for its voxels
    /// keeps its state so the pending noise step is not skipped.
    pub(crate) fn complete(&self, job: &ChunkJob) {
        let chunk = job.chunk();
        if chunk.state().has_voxels() {
            chunk.advance(ChunkState::Generated);
        }
        job.mark_completed();
    }
}
