//! Per-face quad construction tables, indexed by `Face::index()`.

use tessel_geom::Vec3;

/// Corner of the face's first vertex relative to the block origin.
pub(crate) const DIRECTIONS: [Vec3; 6] = [
    Vec3::FORWARD,
    Vec3::ZERO,
    Vec3::UP,
    Vec3::ZERO,
    Vec3::ZERO,
    Vec3::RIGHT,
];

/// First edge of the quad.
pub(crate) const OFFSET1: [Vec3; 6] = [
    Vec3::RIGHT,
    Vec3::RIGHT,
    Vec3::RIGHT,
    Vec3::RIGHT,
    Vec3::FORWARD,
    Vec3::FORWARD,
];

/// Second edge of the quad.
pub(crate) const OFFSET2: [Vec3; 6] = [
    Vec3::UP,
    Vec3::UP,
    Vec3::FORWARD,
    Vec3::FORWARD,
    Vec3::UP,
    Vec3::UP,
];

pub(crate) const TRI1: [u32; 6] = [1, 0, 2, 1, 2, 3];
pub(crate) const TRI2: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// Winding per face: `false` selects `TRI1`, `true` selects `TRI2`.
pub(crate) const USE_TRI2: [bool; 6] = [true, false, false, true, true, false];

#[inline]
pub(crate) fn winding(face: usize) -> &'static [u32; 6] {
    if USE_TRI2[face] { &TRI2 } else { &TRI1 }
}
