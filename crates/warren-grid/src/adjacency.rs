//! Neighborhood rules for lattice traversal.

use serde::{Deserialize, Serialize};

use crate::point::{Direction, Point};

/// Which cells count as neighbors of a given cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjacencyRule {
    Cardinals,
    Diagonals,
    EightWay,
}

const CARDINALS: [Direction; 4] =
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

const CARDINALS_CLOCKWISE: [Direction; 4] =
    [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

const DIAGONALS: [Direction; 4] =
    [Direction::UpLeft, Direction::UpRight, Direction::DownLeft, Direction::DownRight];

const DIAGONALS_CLOCKWISE: [Direction; 4] =
    [Direction::UpRight, Direction::DownRight, Direction::DownLeft, Direction::UpLeft];

const EIGHT_WAY: [Direction; 8] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::UpLeft,
    Direction::UpRight,
    Direction::DownLeft,
    Direction::DownRight,
];

const EIGHT_WAY_CLOCKWISE: [Direction; 8] = [
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::DownRight,
    Direction::Down,
    Direction::DownLeft,
    Direction::Left,
    Direction::UpLeft,
];

impl AdjacencyRule {
    /// Neighbor directions in the rule's canonical enumeration order.
    pub fn directions_of_neighbors(self) -> &'static [Direction] {
        match self {
            AdjacencyRule::Cardinals => &CARDINALS,
            AdjacencyRule::Diagonals => &DIAGONALS,
            AdjacencyRule::EightWay => &EIGHT_WAY,
        }
    }

    /// Neighbor directions in clockwise order starting at (or nearest to) `Up`.
    pub fn directions_of_neighbors_clockwise(self) -> &'static [Direction] {
        match self {
            AdjacencyRule::Cardinals => &CARDINALS_CLOCKWISE,
            AdjacencyRule::Diagonals => &DIAGONALS_CLOCKWISE,
            AdjacencyRule::EightWay => &EIGHT_WAY_CLOCKWISE,
        }
    }

    pub fn neighbors(self, pos: Point) -> impl Iterator<Item = Point> {
        self.directions_of_neighbors().iter().map(move |&dir| pos + dir)
    }

    pub fn neighbors_clockwise(self, pos: Point) -> impl Iterator<Item = Point> {
        self.directions_of_neighbors_clockwise().iter().map(move |&dir| pos + dir)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn eight_way_is_the_union_of_cardinals_and_diagonals() {
        let eight: HashSet<_> = AdjacencyRule::EightWay.neighbors(Point::new(0, 0)).collect();
        let mut union: HashSet<_> = AdjacencyRule::Cardinals.neighbors(Point::new(0, 0)).collect();
        union.extend(AdjacencyRule::Diagonals.neighbors(Point::new(0, 0)));
        assert_eq!(eight, union);
        assert_eq!(eight.len(), 8);
    }

    #[test]
    fn clockwise_order_starts_at_up_and_rotates_right() {
        let dirs = AdjacencyRule::EightWay.directions_of_neighbors_clockwise();
        for pair in dirs.windows(2) {
            assert_eq!(pair[0].rotate(1), pair[1]);
        }
        assert_eq!(dirs[0], Direction::Up);
    }
}
