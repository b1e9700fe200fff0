use tessel_chunk::Column;
use tessel_runtime::{ChunkJob, VisualSink};

/// Headless stand-in for a renderer: tallies what would be uploaded.
#[derive(Debug, Default)]
pub struct StatsSink {
    pub uploads: usize,
    pub empty_chunks: usize,
    pub vertices: usize,
    pub opaque_triangles: usize,
    pub transparent_triangles: usize,
    pub collider_quads: usize,
    pub released_columns: usize,
}

impl VisualSink for StatsSink {
    fn upload(&mut self, job: &ChunkJob) {
        self.uploads += 1;
        if let Some(mesh) = job.mesh() {
            if mesh.is_empty() {
                self.empty_chunks += 1;
            }
            self.vertices += mesh.vertex_count();
            self.opaque_triangles += mesh.idx.len() / 3;
            self.transparent_triangles += mesh.idx_transparent.len() / 3;
        }
        if let Some(c) = job.collider() {
            self.collider_quads += c.quads.len();
        }
    }

    fn release(&mut self, _column: &Column) {
        self.released_columns += 1;
    }
}
