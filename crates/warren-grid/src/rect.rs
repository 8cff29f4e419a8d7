//! Axis-aligned rectangles with inclusive extents.

use serde::{Deserialize, Serialize};

use crate::point::{Direction, Point};

/// A rectangle described by its top-left corner and positive dimensions.
///
/// Extents are inclusive: a `width` of 5 spans columns `x ..= x + 4`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The rectangle covering both corner points, in either order.
    pub fn from_extents(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        let max_x = a.x.max(b.x);
        let max_y = a.y.max(b.y);
        Self { x: min_x, y: min_y, width: max_x - min_x + 1, height: max_y - min_y + 1 }
    }

    pub fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn min_extent(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max_extent(self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(self) -> i32 {
        self.width * self.height
    }

    /// Grows the rectangle outward by `dx` columns on the left and right and
    /// `dy` rows on the top and bottom.
    pub fn expand(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x - dx, y: self.y - dy, width: self.width + 2 * dx, height: self.height + 2 * dy }
    }

    pub fn contains(self, pos: Point) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    pub fn intersects(self, other: Rectangle) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// The smallest rectangle covering both `self` and `other`.
    pub fn union(self, other: Rectangle) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        Self { x: min_x, y: min_y, width: max_x - min_x + 1, height: max_y - min_y + 1 }
    }

    /// All positions in the rectangle, row-major.
    pub fn positions(self) -> impl Iterator<Item = Point> {
        let Rectangle { x, y, width, height } = self;
        (y..y + height).flat_map(move |py| (x..x + width).map(move |px| Point::new(px, py)))
    }

    /// Edge positions, walked clockwise from the top-left corner. Each corner
    /// appears exactly once.
    pub fn perimeter_positions(self) -> Vec<Point> {
        let mut positions = Vec::new();
        if self.width <= 0 || self.height <= 0 {
            return positions;
        }
        if self.height == 1 {
            positions.extend((self.x..=self.right()).map(|px| Point::new(px, self.y)));
            return positions;
        }
        if self.width == 1 {
            positions.extend((self.y..=self.bottom()).map(|py| Point::new(self.x, py)));
            return positions;
        }
        positions.extend((self.x..=self.right()).map(|px| Point::new(px, self.y)));
        positions.extend((self.y + 1..=self.bottom() - 1).map(|py| Point::new(self.right(), py)));
        positions.extend((self.x..=self.right()).rev().map(|px| Point::new(px, self.bottom())));
        positions.extend((self.y + 1..=self.bottom() - 1).rev().map(|py| Point::new(self.x, py)));
        positions
    }

    /// Positions along one side, including that side's corners. Only cardinal
    /// directions name a side.
    pub fn positions_on_side(self, side: Direction) -> Vec<Point> {
        match side {
            Direction::Up => (self.x..=self.right()).map(|px| Point::new(px, self.y)).collect(),
            Direction::Down => {
                (self.x..=self.right()).map(|px| Point::new(px, self.bottom())).collect()
            }
            Direction::Left => (self.y..=self.bottom()).map(|py| Point::new(self.x, py)).collect(),
            Direction::Right => {
                (self.y..=self.bottom()).map(|py| Point::new(self.right(), py)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Whether `pos` lies on the edge named by the cardinal `side`.
    pub fn is_on_side(self, pos: Point, side: Direction) -> bool {
        if !self.contains(pos) {
            return false;
        }
        match side {
            Direction::Up => pos.y == self.y,
            Direction::Down => pos.y == self.bottom(),
            Direction::Left => pos.x == self.x,
            Direction::Right => pos.x == self.right(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_are_inclusive() {
        let rect = Rectangle::new(2, 3, 4, 2);
        assert_eq!(rect.right(), 5);
        assert_eq!(rect.bottom(), 4);
        assert_eq!(rect.min_extent(), Point::new(2, 3));
        assert_eq!(rect.max_extent(), Point::new(5, 4));
        assert_eq!(rect.positions().count(), 8);
    }

    #[test]
    fn expand_grows_outward_on_every_side() {
        let rect = Rectangle::new(5, 5, 3, 3).expand(2, 1);
        assert_eq!(rect, Rectangle::new(3, 4, 7, 5));
    }

    #[test]
    fn perimeter_visits_each_edge_cell_once() {
        let rect = Rectangle::new(0, 0, 4, 3);
        let perimeter = rect.perimeter_positions();
        assert_eq!(perimeter.len(), 10);
        let unique: std::collections::HashSet<_> = perimeter.iter().copied().collect();
        assert_eq!(unique.len(), perimeter.len());
        for pos in rect.positions() {
            let on_edge =
                pos.x == 0 || pos.y == 0 || pos.x == rect.right() || pos.y == rect.bottom();
            assert_eq!(unique.contains(&pos), on_edge, "mismatch at {pos:?}");
        }
    }

    #[test]
    fn degenerate_rows_and_columns_have_simple_perimeters() {
        assert_eq!(Rectangle::new(0, 0, 4, 1).perimeter_positions().len(), 4);
        assert_eq!(Rectangle::new(0, 0, 1, 5).perimeter_positions().len(), 5);
    }

    #[test]
    fn side_membership_uses_cardinal_directions_only() {
        let rect = Rectangle::new(1, 1, 3, 3);
        assert!(rect.is_on_side(Point::new(1, 2), Direction::Left));
        assert!(rect.is_on_side(Point::new(3, 1), Direction::Up));
        assert!(!rect.is_on_side(Point::new(2, 2), Direction::Up));
        assert!(!rect.is_on_side(Point::new(1, 1), Direction::UpLeft));
        assert_eq!(rect.positions_on_side(Direction::Down), vec![
            Point::new(1, 3),
            Point::new(2, 3),
            Point::new(3, 3)
        ]);
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = Rectangle::new(0, 0, 2, 2);
        let b = Rectangle::new(4, 3, 2, 2);
        assert_eq!(a.union(b), Rectangle::new(0, 0, 6, 5));
    }
}
