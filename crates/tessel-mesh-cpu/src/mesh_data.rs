use tessel_blocks::UvRect;
use tessel_geom::Vec3;

use crate::tables::{DIRECTIONS, OFFSET1, OFFSET2, winding};

/// Render mesh of one chunk in chunk-local space.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshData {
    pub pos: Vec<f32>,
    pub uv: Vec<f32>,
    /// One light value per vertex.
    pub light: Vec<f32>,
    pub idx: Vec<u32>,
    pub idx_transparent: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertex_count() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Pre-reserve capacity for approximately `n_quads` faces.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.light.reserve(n_quads * 4);
        self.idx.reserve(n_quads * 6);
    }

    /// Appends the quad for `face` of the block at `block`. `inset` pulls
    /// the quad towards the block centre.
    pub(crate) fn add_face(
        &mut self,
        face: usize,
        block: Vec3,
        inset: f32,
        uv: UvRect,
        light: f32,
        transparent: bool,
    ) {
        let base = self.vertex_count() as u32;
        let shift = match face {
            0 => Vec3::new(0.0, 0.0, -inset),
            1 => Vec3::new(0.0, 0.0, inset),
            4 => Vec3::new(inset, 0.0, 0.0),
            5 => Vec3::new(-inset, 0.0, 0.0),
            _ => Vec3::ZERO,
        };
        let o = DIRECTIONS[face] + block + shift;
        let (e1, e2) = (OFFSET1[face], OFFSET2[face]);
        for v in [o, o + e1, o + e2, o + e1 + e2] {
            self.pos.extend_from_slice(&v.to_array());
        }
        self.uv.extend_from_slice(&[
            uv.x,
            uv.y,
            uv.x + uv.w,
            uv.y,
            uv.x,
            uv.y + uv.h,
            uv.x + uv.w,
            uv.y + uv.h,
        ]);
        self.light.extend_from_slice(&[light; 4]);
        let list = if transparent {
            &mut self.idx_transparent
        } else {
            &mut self.idx
        };
        list.extend(winding(face).iter().map(|k| base + k));
    }
}
