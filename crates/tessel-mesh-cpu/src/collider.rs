//! Greedy collider reduction.
//!
//! Exposed faces of solid blocks are gathered slice by slice for each face
//! direction and merged into maximal rectangles, so a flat floor of any
//! size collapses into a single quad.

use tessel_blocks::BlockRegistry;
use tessel_chunk::{CHUNK_SIZE, Face, Neighborhood};
use tessel_geom::{Aabb, Vec3};

use crate::tables::winding;

const S: usize = CHUNK_SIZE;

/// One merged collision quad. `bounds` is flat along the face normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColliderQuad {
    pub face: Face,
    pub bounds: Aabb,
}

/// Collision geometry of one chunk in chunk-local space.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ColliderData {
    pub quads: Vec<ColliderQuad>,
    pub pos: Vec<f32>,
    pub idx: Vec<u32>,
}

impl ColliderData {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Total covered area, equal to the number of exposed unit faces.
    pub fn area(&self) -> f32 {
        self.quads
            .iter()
            .map(|q| {
                let s = q.bounds.size();
                s.x * s.y + s.y * s.z + s.x * s.z
            })
            .sum()
    }

    fn push(&mut self, face: Face, slice: usize, u: usize, v: usize, w: usize, h: usize) {
        let plane = match face {
            Face::Forward | Face::Up | Face::Right => slice + 1,
            _ => slice,
        };
        let plane = plane as f32;
        let (u0, v0, u1, v1) = (u as f32, v as f32, (u + w) as f32, (v + h) as f32);
        let (min, max) = match face {
            Face::Forward | Face::Back => (Vec3::new(u0, v0, plane), Vec3::new(u1, v1, plane)),
            Face::Up | Face::Down => (Vec3::new(u0, plane, v0), Vec3::new(u1, plane, v1)),
            Face::Left | Face::Right => (Vec3::new(plane, v0, u0), Vec3::new(plane, v1, u1)),
        };
        let (eu, ev) = match face {
            Face::Forward | Face::Back => (Vec3::RIGHT, Vec3::UP),
            Face::Up | Face::Down => (Vec3::RIGHT, Vec3::FORWARD),
            Face::Left | Face::Right => (Vec3::FORWARD, Vec3::UP),
        };
        let (eu, ev) = (eu * w as f32, ev * h as f32);
        let base = (self.pos.len() / 3) as u32;
        for p in [min, min + eu, min + ev, min + eu + ev] {
            self.pos.extend_from_slice(&p.to_array());
        }
        self.idx.extend(winding(face.index()).iter().map(|k| base + k));
        self.quads.push(ColliderQuad {
            face,
            bounds: Aabb::new(min, max),
        });
    }
}

/// Chunk-local cell for (slice, u, v) of a face direction.
#[inline]
fn cell(face: Face, slice: usize, u: usize, v: usize) -> (usize, usize, usize) {
    match face {
        Face::Forward | Face::Back => (u, v, slice),
        Face::Up | Face::Down => (u, slice, v),
        Face::Left | Face::Right => (slice, v, u),
    }
}

/// A solid block's face is exposed when the neighbour is not solid. A
/// neighbour outside the resident window counts as solid.
fn exposed(nb: &Neighborhood, reg: &BlockRegistry, face: Face, x: usize, y: usize, z: usize) -> bool {
    let b = nb.center.get(x, y, z);
    if b.is_air() || !reg.is_solid(b) {
        return false;
    }
    let (dx, dy, dz) = face.delta();
    match nb.block_at(x as i32 + dx, y as i32 + dy, z as i32 + dz) {
        Some(n) => !reg.is_solid(n),
        None => false,
    }
}

/// Merges every set cell of `mask` into rectangles, clearing it as it goes.
fn merge_mask(mask: &mut [bool; S * S], mut emit: impl FnMut(usize, usize, usize, usize)) {
    for v in 0..S {
        let mut u = 0;
        while u < S {
            if !mask[v * S + u] {
                u += 1;
                continue;
            }
            let mut w = 1;
            while u + w < S && mask[v * S + u + w] {
                w += 1;
            }
            let mut h = 1;
            'grow: while v + h < S {
                for k in 0..w {
                    if !mask[(v + h) * S + u + k] {
                        break 'grow;
                    }
                }
                h += 1;
            }
            for dv in 0..h {
                for du in 0..w {
                    mask[(v + dv) * S + u + du] = false;
                }
            }
            emit(u, v, w, h);
            u += w;
        }
    }
}

pub fn reduce_collider(nb: &Neighborhood, reg: &BlockRegistry) -> ColliderData {
    let mut out = ColliderData::default();
    if nb.center.is_all_air() {
        return out;
    }
    let mut mask = [false; S * S];
    for face in Face::ALL {
        for slice in 0..S {
            let mut any = false;
            for v in 0..S {
                for u in 0..S {
                    let (x, y, z) = cell(face, slice, u, v);
                    let e = exposed(nb, reg, face, x, y, z);
                    mask[v * S + u] = e;
                    any |= e;
                }
            }
            if any {
                merge_mask(&mut mask, |u, v, w, h| out.push(face, slice, u, v, w, h));
            }
        }
    }
    out
}
