/// Cube face / step direction. The discriminant order is shared by the
/// mesher tables, the lighting sweep and per-face UVs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Forward = 0,
    Back = 1,
    Up = 2,
    Down = 3,
    Left = 4,
    Right = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Forward,
        Face::Back,
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
    ];

    pub const LATERAL: [Face; 4] = [Face::Forward, Face::Back, Face::Left, Face::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Falls back to `Forward` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            1 => Face::Back,
            2 => Face::Up,
            3 => Face::Down,
            4 => Face::Left,
            5 => Face::Right,
            _ => Face::Forward,
        }
    }

    /// Integer step `(dx, dy, dz)` when leaving a cell through this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Forward => (0, 0, 1),
            Face::Back => (0, 0, -1),
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Forward => Face::Back,
            Face::Back => Face::Forward,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
        }
    }
}
