/// Horizontal step of the window. Forward is +Z, Right is +X.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    /// Column step `(dx, dz)`.
    #[inline]
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Forward => (0, 1),
            Direction::Back => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Single-axis unit step back to a direction.
    pub fn from_step(dx: i32, dz: i32) -> Option<Direction> {
        match (dx.signum(), dz.signum()) {
            (0, 1) => Some(Direction::Forward),
            (0, -1) => Some(Direction::Back),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}
