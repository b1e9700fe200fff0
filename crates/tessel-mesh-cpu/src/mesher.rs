use tessel_blocks::{Block, BlockRegistry};
use tessel_chunk::{CHUNK_SIZE, Face, Neighborhood};
use tessel_geom::Vec3;
use tessel_lighting::{LightField, SKY};

use crate::mesh_data::MeshData;

/// Whether `face` of the non-air block `b` at (x,y,z) is drawn.
///
/// Transparent blocks draw every face. An opaque block hides a face whose
/// neighbour is a non-air, non-transparent block; a neighbour outside the
/// resident window counts as solid.
#[inline]
pub fn face_visible(nb: &Neighborhood, reg: &BlockRegistry, b: Block, face: Face, x: i32, y: i32, z: i32) -> bool {
    if b.is_air() {
        return false;
    }
    if reg.is_transparent(b) {
        return true;
    }
    let (dx, dy, dz) = face.delta();
    match nb.block_at(x + dx, y + dy, z + dz) {
        Some(n) => !reg.is_opaque(n),
        None => false,
    }
}

/// Number of (opaque, transparent) faces `build_chunk_mesh` would emit.
pub fn count_exposed_faces(nb: &Neighborhood, reg: &BlockRegistry) -> (usize, usize) {
    let (mut opaque, mut transparent) = (0, 0);
    for_each_visible(nb, reg, |b, _, _, _, _| {
        if reg.is_transparent(b) {
            transparent += 1;
        } else {
            opaque += 1;
        }
    });
    (opaque, transparent)
}

fn for_each_visible(nb: &Neighborhood, reg: &BlockRegistry, mut f: impl FnMut(Block, Face, i32, i32, i32)) {
    let s = CHUNK_SIZE as i32;
    for y in 0..s {
        for z in 0..s {
            for x in 0..s {
                let b = nb.center.get(x as usize, y as usize, z as usize);
                if b.is_air() {
                    continue;
                }
                for face in Face::ALL {
                    if face_visible(nb, reg, b, face, x, y, z) {
                        f(b, face, x, y, z);
                    }
                }
            }
        }
    }
}

fn face_light(light: Option<&LightField>, face: Face, x: i32, y: i32, z: i32) -> f32 {
    let Some(field) = light else {
        return SKY;
    };
    let (dx, dy, dz) = face.delta();
    field
        .get_i(x + dx, y + dy, z + dz)
        .or_else(|| field.get_i(x, y, z))
        .unwrap_or(SKY)
}

/// Face-culled mesh of the centre chunk. Without a light field every
/// vertex is fully lit.
pub fn build_chunk_mesh(nb: &Neighborhood, reg: &BlockRegistry, light: Option<&LightField>) -> MeshData {
    let mut out = MeshData::default();
    if nb.center.is_all_air() {
        return out;
    }
    let (opaque, transparent) = count_exposed_faces(nb, reg);
    out.reserve_quads(opaque + transparent);
    for_each_visible(nb, reg, |b, face, x, y, z| {
        let fi = face.index();
        out.add_face(
            fi,
            Vec3::from_cell(x, y, z),
            reg.mesh_offset(b),
            reg.uv(b, fi),
            face_light(light, face, x, y, z),
            reg.is_transparent(b),
        );
    });
    out
}
