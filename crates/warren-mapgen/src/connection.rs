//! Policies for connecting areas: where to connect, and how to carve.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{
    bresenham, orthogonal, Area, Distance, Grid, GridView, MultiArea, Point, SettableGridView,
};

/// Picks one connection point in each of two areas.
pub trait ConnectionPointSelector {
    fn select_connection_points(&mut self, a: &MultiArea<'_>, b: &MultiArea<'_>)
        -> (Point, Point);
}

/// Uniformly random point from each area.
pub struct RandomConnectionPointSelector<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> RandomConnectionPointSelector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ConnectionPointSelector for RandomConnectionPointSelector<R> {
    fn select_connection_points(
        &mut self,
        a: &MultiArea<'_>,
        b: &MultiArea<'_>,
    ) -> (Point, Point) {
        debug_assert!(!a.is_empty() && !b.is_empty(), "cannot connect empty areas");
        let from = a.get(self.rng.gen_range(0..a.len())).expect("index inside area");
        let to = b.get(self.rng.gen_range(0..b.len())).expect("index inside area");
        (from, to)
    }
}

/// The closest pair of points under a metric; the first minimum encountered
/// wins ties.
pub struct ClosestConnectionPointSelector {
    pub distance: Distance,
}

impl ConnectionPointSelector for ClosestConnectionPointSelector {
    fn select_connection_points(
        &mut self,
        a: &MultiArea<'_>,
        b: &MultiArea<'_>,
    ) -> (Point, Point) {
        debug_assert!(!a.is_empty() && !b.is_empty(), "cannot connect empty areas");
        let mut best: Option<(f64, Point, Point)> = None;
        for from in a.iter() {
            for to in b.iter() {
                let separation = self.distance.between(from, to);
                if best.map_or(true, |(best_separation, _, _)| separation < best_separation) {
                    best = Some((separation, from, to));
                }
            }
        }
        let (_, from, to) = best.expect("both areas are non-empty");
        (from, to)
    }
}

/// Centers of the areas' bounding rectangles.
pub struct CenterBoundsConnectionPointSelector;

impl ConnectionPointSelector for CenterBoundsConnectionPointSelector {
    fn select_connection_points(
        &mut self,
        a: &MultiArea<'_>,
        b: &MultiArea<'_>,
    ) -> (Point, Point) {
        let from = a.bounds().expect("non-empty area").center();
        let to = b.bounds().expect("non-empty area").center();
        (from, to)
    }
}

/// Carves a corridor between two points and reports the cells it opened.
pub trait TunnelCreator {
    fn create_tunnel(&mut self, map: &mut Grid<bool>, start: Point, end: Point) -> Area;
}

/// An L-shaped corridor; a fair coin picks which leg comes first.
pub struct HorizontalVerticalTunnelCreator<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl<R: Rng> HorizontalVerticalTunnelCreator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TunnelCreator for HorizontalVerticalTunnelCreator<R> {
    fn create_tunnel(&mut self, map: &mut Grid<bool>, start: Point, end: Point) -> Area {
        let mut tunnel = Area::new();
        if self.rng.gen_bool(0.5) {
            carve_horizontal_run(map, &mut tunnel, start.y, start.x, end.x);
            carve_vertical_run(map, &mut tunnel, end.x, start.y, end.y);
        } else {
            carve_vertical_run(map, &mut tunnel, start.x, start.y, end.y);
            carve_horizontal_run(map, &mut tunnel, end.y, start.x, end.x);
        }
        tunnel
    }
}

fn carve_horizontal_run(
    map: &mut Grid<bool>,
    tunnel: &mut Area,
    y: i32,
    from_x: i32,
    to_x: i32,
) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        carve_cell(map, tunnel, Point::new(x, y));
    }
}

fn carve_vertical_run(map: &mut Grid<bool>, tunnel: &mut Area, x: i32, from_y: i32, to_y: i32) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        carve_cell(map, tunnel, Point::new(x, y));
    }
}

fn carve_cell(map: &mut Grid<bool>, tunnel: &mut Area, pos: Point) {
    if map.contains(pos) {
        map.set(pos, true);
        tunnel.add(pos);
    }
}

/// A rasterized straight corridor.
///
/// Manhattan metrics rasterize orthogonally so the corridor stays
/// 4-connected; any other metric uses Bresenham. With
/// `double_wide_vertical`, every step that changes row also opens the cell
/// to its right, as long as that cell stays left of the rightmost column.
pub struct DirectLineTunnelCreator {
    pub distance: Distance,
    pub double_wide_vertical: bool,
}

impl DirectLineTunnelCreator {
    pub fn new(distance: Distance) -> Self {
        Self { distance, double_wide_vertical: true }
    }
}

impl TunnelCreator for DirectLineTunnelCreator {
    fn create_tunnel(&mut self, map: &mut Grid<bool>, start: Point, end: Point) -> Area {
        let points = match self.distance {
            Distance::Manhattan => orthogonal(start, end),
            _ => bresenham(start, end),
        };

        let mut tunnel = Area::new();
        let mut previous: Option<Point> = None;
        for pos in points {
            carve_cell(map, &mut tunnel, pos);
            if self.double_wide_vertical
                && previous.map_or(false, |previous| previous.y != pos.y)
                && pos.x + 1 < map.width() as i32 - 1
            {
                carve_cell(map, &mut tunnel, Point::new(pos.x + 1, pos.y));
            }
            previous = Some(pos);
        }
        tunnel
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    fn wall_map(width: usize, height: usize) -> Grid<bool> {
        Grid::new(width, height)
    }

    fn area_of(points: &[Point]) -> Area {
        points.iter().copied().collect()
    }

    #[test]
    fn closest_selector_finds_the_nearest_pair() {
        let left = area_of(&[Point::new(0, 0), Point::new(2, 0)]);
        let right = area_of(&[Point::new(9, 9), Point::new(4, 0)]);
        let left_multi: MultiArea = [&left].into_iter().collect();
        let right_multi: MultiArea = [&right].into_iter().collect();

        let mut selector = ClosestConnectionPointSelector { distance: Distance::Manhattan };
        let (from, to) = selector.select_connection_points(&left_multi, &right_multi);
        assert_eq!((from, to), (Point::new(2, 0), Point::new(4, 0)));
    }

    #[test]
    fn center_bounds_selector_uses_rectangle_centers() {
        let left = area_of(&[Point::new(0, 0), Point::new(4, 4)]);
        let right = area_of(&[Point::new(10, 0)]);
        let left_multi: MultiArea = [&left].into_iter().collect();
        let right_multi: MultiArea = [&right].into_iter().collect();

        let (from, to) = CenterBoundsConnectionPointSelector
            .select_connection_points(&left_multi, &right_multi);
        assert_eq!((from, to), (Point::new(2, 2), Point::new(10, 0)));
    }

    #[test]
    fn random_selector_stays_inside_the_areas() {
        let left = area_of(&[Point::new(1, 1), Point::new(2, 1), Point::new(3, 1)]);
        let right = area_of(&[Point::new(7, 7)]);
        let left_multi: MultiArea = [&left].into_iter().collect();
        let right_multi: MultiArea = [&right].into_iter().collect();

        let mut selector =
            RandomConnectionPointSelector::new(ChaCha8Rng::seed_from_u64(11));
        for _ in 0..32 {
            let (from, to) = selector.select_connection_points(&left_multi, &right_multi);
            assert!(left.contains(from));
            assert_eq!(to, Point::new(7, 7));
        }
    }

    #[test]
    fn horizontal_vertical_creator_carves_an_l_shape() {
        let mut map = wall_map(12, 12);
        let mut creator = HorizontalVerticalTunnelCreator::new(ChaCha8Rng::seed_from_u64(3));
        let tunnel = creator.create_tunnel(&mut map, Point::new(2, 2), Point::new(7, 6));

        // Both endpoints open, every opened cell recorded, and the carve is
        // exactly the two legs of an L in one of the two orders.
        assert!(map.get(Point::new(2, 2)));
        assert!(map.get(Point::new(7, 6)));
        assert_eq!(tunnel.len(), 10);
        for pos in tunnel.iter() {
            assert!(map.get(pos));
            assert!(pos.x == 2 || pos.x == 7 || pos.y == 2 || pos.y == 6);
        }
    }

    #[test]
    fn manhattan_direct_line_is_four_connected() {
        let mut map = wall_map(16, 16);
        let mut creator = DirectLineTunnelCreator {
            distance: Distance::Manhattan,
            double_wide_vertical: false,
        };
        let tunnel = creator.create_tunnel(&mut map, Point::new(2, 3), Point::new(9, 8));

        let cells: Vec<Point> = tunnel.iter().collect();
        for pair in cells.windows(2) {
            let dx = (pair[1].x - pair[0].x).abs();
            let dy = (pair[1].y - pair[0].y).abs();
            assert_eq!(dx + dy, 1, "diagonal step between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn double_wide_lines_widen_row_changes_only() {
        let mut map = wall_map(16, 16);
        let mut creator = DirectLineTunnelCreator::new(Distance::Chebyshev);
        let tunnel = creator.create_tunnel(&mut map, Point::new(3, 2), Point::new(3, 7));

        for y in 3..=7 {
            assert!(map.get(Point::new(3, y)));
            assert!(map.get(Point::new(4, y)), "vertical step at row {y} should widen");
        }
        assert!(!map.get(Point::new(4, 2)), "the first cell of the line never widens");
        assert_eq!(tunnel.len(), 11);
    }
}
