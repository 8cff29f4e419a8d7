//! Lattice points and the eight compass directions.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point { x: self.x + dx, y: self.y + dy }
    }
}

impl AddAssign<Direction> for Point {
    fn add_assign(&mut self, direction: Direction) {
        *self = *self + direction;
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// Compass directions on a grid where y grows downward, so `Up` is `(0, -1)`.
///
/// The eight real directions are ordered clockwise starting at `Up`; `None`
/// is the identity used for "no facing yet" states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    None,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub const DIAGONALS: [Direction; 4] =
        [Direction::UpLeft, Direction::UpRight, Direction::DownLeft, Direction::DownRight];

    const CLOCKWISE: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::None => (0, 0),
        }
    }

    pub fn dx(self) -> i32 {
        self.delta().0
    }

    pub fn dy(self) -> i32 {
        self.delta().1
    }

    pub fn is_cardinal(self) -> bool {
        matches!(self, Direction::Up | Direction::Down | Direction::Left | Direction::Right)
    }

    /// Rotates clockwise by `steps` eighth-turns; negative values rotate
    /// counter-clockwise. `None` never rotates into a real direction.
    pub fn rotate(self, steps: i32) -> Direction {
        if self == Direction::None {
            return Direction::None;
        }
        let index =
            Direction::CLOCKWISE.iter().position(|&d| d == self).expect("real direction") as i32;
        let rotated = (index + steps).rem_euclid(8) as usize;
        Direction::CLOCKWISE[rotated]
    }

    /// The opposite direction, i.e. a rotation by four eighth-turns.
    pub fn opposite(self) -> Direction {
        self.rotate(4)
    }
}
