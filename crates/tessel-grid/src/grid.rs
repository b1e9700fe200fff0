use std::sync::{Arc, Mutex, RwLock};

use tessel_chunk::{CHUNK_SIZE, Chunk, Column, ColumnPos, Face, LocalPos, Neighborhood};
use tessel_world::WorldConfig;

use crate::direction::Direction;

/// Receiver of column work produced by a shift.
pub trait JobSink: Send + Sync {
    fn pass_begin(&self);
    fn add(&self, column: Arc<Column>, run_with_noise: bool);
    fn pass_end(&self);
}

/// Columns touched by one shift.
#[derive(Default, Debug)]
pub struct ShiftOutcome {
    /// Trailing edge, no longer resident. Visual resources must be released.
    pub evicted: Vec<Arc<Column>>,
    /// New leading edge, submitted with noise.
    pub created: Vec<Arc<Column>>,
    /// Old edge abutting the new one, submitted for a rebuild without noise.
    pub rebuilt: Vec<Arc<Column>>,
}

/// Square window of `2·draw_distance+1` columns.
///
/// Cell reads lock only their cell. `shift` holds the structural lock for
/// the whole relabel and submission, and neighbourhood snapshots take it
/// shared so a job never pairs chunks from two different window layouts.
pub struct Grid {
    dimension: usize,
    draw_distance: usize,
    chunks_vertically: usize,
    min_height: i32,
    max_height: i32,
    cells: Vec<Mutex<Arc<Column>>>,
    origin: Mutex<ColumnPos>,
    structure: RwLock<()>,
}

impl Grid {
    /// Window centered on the column `center`.
    pub fn new(draw_distance: usize, min_height: i32, max_height: i32, center: ColumnPos) -> Self {
        let dimension = 2 * draw_distance + 1;
        let dd = draw_distance as i32;
        let origin = center.offset_chunks(-dd, -dd);
        let mut cells = Vec::with_capacity(dimension * dimension);
        for z in 0..dimension as i32 {
            for x in 0..dimension as i32 {
                let col = Column::new(origin.offset_chunks(x, z), (x, z), min_height, max_height);
                cells.push(Mutex::new(col));
            }
        }
        let grid = Self {
            dimension,
            draw_distance,
            chunks_vertically: ((max_height - min_height) / CHUNK_SIZE as i32).max(0) as usize,
            min_height,
            max_height,
            cells,
            origin: Mutex::new(origin),
            structure: RwLock::new(()),
        };
        grid.refresh_desired();
        grid
    }

    pub fn from_config(cfg: &WorldConfig, center: ColumnPos) -> Self {
        Self::new(cfg.draw_distance, cfg.min_height, cfg.max_height, center)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn draw_distance(&self) -> usize {
        self.draw_distance
    }

    #[inline]
    pub fn chunks_vertically(&self) -> usize {
        self.chunks_vertically
    }

    #[inline]
    pub fn chunks_in_total(&self) -> usize {
        self.dimension * self.dimension * self.chunks_vertically
    }

    /// World position of slot `(0, 0)`.
    pub fn origin(&self) -> ColumnPos {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// World position of the centre column.
    pub fn center(&self) -> ColumnPos {
        let dd = self.draw_distance as i32;
        self.origin().offset_chunks(dd, dd)
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> Option<usize> {
        let d = self.dimension as i32;
        ((0..d).contains(&x) && (0..d).contains(&z)).then(|| (x + z * d) as usize)
    }

    #[inline]
    fn load(&self, i: usize) -> Arc<Column> {
        Arc::clone(&self.cells[i].lock().unwrap_or_else(|e| e.into_inner()))
    }

    #[inline]
    fn store(&self, i: usize, col: Arc<Column>) {
        *self.cells[i].lock().unwrap_or_else(|e| e.into_inner()) = col;
    }

    /// Chunk at a grid slot; `None` outside the window or the vertical range.
    pub fn get_chunk(&self, local: LocalPos) -> Option<Arc<Chunk>> {
        if local.y < 0 || local.y >= self.chunks_vertically as i32 {
            return None;
        }
        let i = self.index(local.x, local.z)?;
        let cell = self.cells[i].lock().unwrap_or_else(|e| e.into_inner());
        cell.chunk(local.y as usize).cloned()
    }

    pub fn get_chunk_column(&self, x: i32, z: i32) -> Option<Arc<Column>> {
        self.index(x, z).map(|i| self.load(i))
    }

    /// Resident column at world position `pos`, if any.
    pub fn column_at(&self, pos: ColumnPos) -> Option<Arc<Column>> {
        let o = self.origin();
        let cs = CHUNK_SIZE as i32;
        let (dx, dz) = (pos.x - o.x, pos.z - o.z);
        if dx.rem_euclid(cs) != 0 || dz.rem_euclid(cs) != 0 {
            return None;
        }
        let col = self.get_chunk_column(dx.div_euclid(cs), dz.div_euclid(cs))?;
        (col.origin() == pos).then_some(col)
    }

    /// True while `column` still occupies a slot of the window.
    pub fn is_resident(&self, column: &Arc<Column>) -> bool {
        self.column_at(column.origin())
            .is_some_and(|c| Arc::ptr_eq(&c, column))
    }

    /// Snapshot of every column, row-major by slot.
    pub fn columns(&self) -> Vec<Arc<Column>> {
        (0..self.cells.len()).map(|i| self.load(i)).collect()
    }

    /// Lateral neighbours in `Forward, Back, Left, Right` order.
    pub fn lateral_neighbors(&self, column: &Column) -> [Option<Arc<Column>>; 4] {
        let (x, z) = column.slot();
        Face::LATERAL.map(|f| {
            let (dx, _, dz) = f.delta();
            self.get_chunk_column(x + dx, z + dz)
        })
    }

    /// A column may be drawn once it and its four lateral neighbours all hold
    /// final noise. Columns on the window border never qualify.
    pub fn draw_eligible(&self, column: &Column) -> bool {
        column.state().at_least_noise_ready()
            && self
                .lateral_neighbors(column)
                .iter()
                .all(|n| n.as_ref().is_some_and(|n| n.state().at_least_noise_ready()))
    }

    /// Voxel snapshots of `chunk` and its six neighbours.
    pub fn neighborhood(&self, chunk: &Chunk) -> Neighborhood {
        let _shared = self.structure.read().unwrap_or_else(|e| e.into_inner());
        let local = chunk.local();
        let mut nb = Neighborhood::isolated(chunk.snapshot());
        for face in Face::ALL {
            let expected = chunk.origin().neighbor(face);
            if let Some(n) = self.get_chunk(local.step(face)) {
                if n.origin() == expected {
                    nb.neighbors[face.index()] = Some(n.snapshot());
                }
            }
        }
        nb
    }

    fn refresh_desired(&self) {
        let last = self.dimension as i32 - 1;
        for col in self.columns() {
            let (x, z) = col.slot();
            col.set_desired_for_visualization(x > 0 && z > 0 && x < last && z < last);
        }
    }

    /// Slides the window one column in `dir`.
    pub fn shift(&self, dir: Direction, sink: &dyn JobSink) -> ShiftOutcome {
        let (dx, dz) = dir.step();
        let d = self.dimension as i32;
        let inside = |x: i32, z: i32| (0..d).contains(&x) && (0..d).contains(&z);
        let leading = |x: i32, z: i32| !inside(x + dx, z + dz);

        let _exclusive = self.structure.write().unwrap_or_else(|e| e.into_inner());
        let old = self.columns();
        let mut out = ShiftOutcome::default();
        for z in 0..d {
            for x in 0..d {
                if !inside(x - dx, z - dz) {
                    out.evicted.push(Arc::clone(&old[(x + z * d) as usize]));
                }
            }
        }

        let origin = {
            let mut o = self.origin.lock().unwrap_or_else(|e| e.into_inner());
            *o = o.offset_chunks(dx, dz);
            *o
        };
        let mut submit = Vec::with_capacity(2 * self.dimension);
        for z in 0..d {
            for x in 0..d {
                let col = if leading(x, z) {
                    let c = Column::new(
                        origin.offset_chunks(x, z),
                        (x, z),
                        self.min_height,
                        self.max_height,
                    );
                    out.created.push(Arc::clone(&c));
                    c
                } else {
                    let c = Arc::clone(&old[((x + dx) + (z + dz) * d) as usize]);
                    c.relabel(x, z);
                    if leading(x + dx, z + dz) {
                        out.rebuilt.push(Arc::clone(&c));
                    }
                    c
                };
                self.store((x + z * d) as usize, col);
            }
        }
        self.refresh_desired();
        for (r, c) in out.rebuilt.iter().zip(&out.created) {
            submit.push((Arc::clone(r), false));
            submit.push((Arc::clone(c), true));
        }

        sink.pass_begin();
        for (col, with_noise) in submit {
            if with_noise {
                col.begin_noise();
            } else {
                col.mark_dirty();
                for c in col.chunks() {
                    c.mark_dirty();
                }
            }
            sink.add(col, with_noise);
        }
        sink.pass_end();

        log::info!(
            target: "grid",
            "shift {:?}: evicted {} created {} rebuilt {} origin ({}, {})",
            dir,
            out.evicted.len(),
            out.created.len(),
            out.rebuilt.len(),
            origin.x,
            origin.z
        );
        out
    }
}
