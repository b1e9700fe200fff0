//! CPU meshing: face-culled render mesh and greedy collider reduction,
//! both pure functions over a voxel neighbourhood snapshot.
#![forbid(unsafe_code)]

mod collider;
mod mesh_data;
mod mesher;
mod tables;

pub use collider::{ColliderData, ColliderQuad, reduce_collider};
pub use mesh_data::MeshData;
pub use mesher::{build_chunk_mesh, count_exposed_faces, face_visible};
