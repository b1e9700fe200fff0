//! Sky lighting: a per-column downward sweep seeds a breadth-first
//! relaxation that spreads light sideways and under overhangs.
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use tessel_blocks::{Block, BlockRegistry};
use tessel_chunk::{CHUNK_SIZE, CHUNK_VOLUME, Face, Neighborhood, VoxelGrid};

pub const SKY: f32 = 1.0;
pub const DEFAULT_FALLOFF: f32 = 0.08;

const PLANE: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Per-voxel light in `[0, 1]`, laid out like `VoxelGrid`.
#[derive(Clone, Debug, PartialEq)]
pub struct LightField {
    values: Box<[f32]>,
}

impl Default for LightField {
    fn default() -> Self {
        Self {
            values: vec![0.0; CHUNK_VOLUME].into_boxed_slice(),
        }
    }
}

impl LightField {
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[VoxelGrid::idx(x, y, z)]
    }

    #[inline]
    pub fn get_i(&self, x: i32, y: i32, z: i32) -> Option<f32> {
        VoxelGrid::in_bounds(x, y, z).then(|| self.get(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: f32) {
        self.values[VoxelGrid::idx(x, y, z)] = v;
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Light can enter a cell whose block lets any of the ray through.
#[inline]
fn passable(reg: &BlockRegistry, b: Block) -> bool {
    reg.transparency(b) > 0.0
}

/// Sweeps every vertical column from the top face down. `entry[x + z·16]`
/// is the ray entering from above; a non-air block caps the ray at its
/// transparency. Returns the field and the rays leaving through the bottom.
pub fn sky_sweep(voxels: &VoxelGrid, reg: &BlockRegistry, entry: &[f32; PLANE]) -> (LightField, [f32; PLANE]) {
    let mut field = LightField::default();
    let mut exit = [0.0; PLANE];
    for z in 0..CHUNK_SIZE {
        for x in 0..CHUNK_SIZE {
            let mut ray = entry[x + z * CHUNK_SIZE];
            for y in (0..CHUNK_SIZE).rev() {
                let b = voxels.get(x, y, z);
                if !b.is_air() {
                    ray = ray.min(reg.transparency(b));
                }
                field.set(x, y, z, ray);
            }
            exit[x + z * CHUNK_SIZE] = ray;
        }
    }
    (field, exit)
}

/// Breadth-first relaxation inside one chunk. Returns how many cells were raised.
pub fn relax(
    field: &mut LightField,
    voxels: &VoxelGrid,
    reg: &BlockRegistry,
    falloff: f32,
    mut frontier: VecDeque<(usize, usize, usize)>,
) -> usize {
    let mut raised = 0;
    while let Some((x, y, z)) = frontier.pop_front() {
        let next = field.get(x, y, z) - falloff;
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
            let Some(b) = voxels.get_i(nx, ny, nz) else {
                continue;
            };
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if passable(reg, b) && field.get(nx, ny, nz) < next {
                field.set(nx, ny, nz, next);
                raised += 1;
                if next > falloff {
                    frontier.push_back((nx, ny, nz));
                }
            }
        }
    }
    raised
}

/// Re-runs relaxation seeded from every lit cell.
pub fn relax_all(field: &mut LightField, voxels: &VoxelGrid, reg: &BlockRegistry, falloff: f32) -> usize {
    let frontier = lit_cells(field, falloff).collect();
    relax(field, voxels, reg, falloff, frontier)
}

fn lit_cells(field: &LightField, falloff: f32) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
    (0..CHUNK_SIZE).flat_map(move |y| {
        (0..CHUNK_SIZE).flat_map(move |z| {
            (0..CHUNK_SIZE).filter_map(move |x| (field.get(x, y, z) > falloff).then_some((x, y, z)))
        })
    })
}

/// Light field of the centre chunk of `nb`.
///
/// The chunk above supplies the entering rays. Present neighbours seed the
/// border cells with their own sweep minus one falloff step; missing
/// neighbours contribute nothing. Only the centre is written.
pub fn compute_light(nb: &Neighborhood, reg: &BlockRegistry, falloff: f32) -> LightField {
    let sky = [SKY; PLANE];
    let up_sweep = nb.neighbor(Face::Up).map(|up| sky_sweep(up, reg, &sky));
    let entry = up_sweep.as_ref().map_or(sky, |(_, exit)| *exit);
    let (mut field, bottom) = sky_sweep(&nb.center, reg, &entry);
    let mut frontier: VecDeque<_> = lit_cells(&field, falloff).collect();

    let s = CHUNK_SIZE as i32;
    for face in Face::ALL {
        let Some(n) = nb.neighbor(face) else {
            continue;
        };
        let nf = match face {
            Face::Up => match &up_sweep {
                Some((f, _)) => f.clone(),
                None => continue,
            },
            Face::Down => sky_sweep(n, reg, &bottom).0,
            _ => sky_sweep(n, reg, &sky).0,
        };
        let (dx, dy, dz) = face.delta();
        for a in 0..s {
            for b in 0..s {
                // cell on the centre's border plane facing `face`
                let (x, y, z) = match face {
                    Face::Forward => (a, b, s - 1),
                    Face::Back => (a, b, 0),
                    Face::Up => (a, s - 1, b),
                    Face::Down => (a, 0, b),
                    Face::Left => (0, a, b),
                    Face::Right => (s - 1, a, b),
                };
                let (ox, oy, oz) = (
                    (x + dx).rem_euclid(s),
                    (y + dy).rem_euclid(s),
                    (z + dz).rem_euclid(s),
                );
                let Some(outside) = nf.get_i(ox, oy, oz) else {
                    continue;
                };
                let (ux, uy, uz) = (x as usize, y as usize, z as usize);
                let seed = outside - falloff;
                if passable(reg, nb.center.get(ux, uy, uz)) && field.get(ux, uy, uz) < seed {
                    field.set(ux, uy, uz, seed);
                    if seed > falloff {
                        frontier.push_back((ux, uy, uz));
                    }
                }
            }
        }
    }

    relax(&mut field, &nb.center, reg, falloff, frontier);
    field
}

#[cfg(test)]
mod tests;
