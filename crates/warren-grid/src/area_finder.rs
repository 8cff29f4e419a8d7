//! Connected-component discovery over boolean grid views.

use thiserror::Error;

use crate::adjacency::AdjacencyRule;
use crate::area::Area;
use crate::point::Point;
use crate::view::{Grid, GridView, SettableGridView};

/// The visited bitmap was built for a view of a different size. Chained
/// fills with `clear_visited = false` require the view to stay the same size.
#[derive(Debug, Error, PartialEq)]
#[error(
    "visited bitmap covers {bitmap_width}x{bitmap_height} but the view is \
     {view_width}x{view_height}; the view must not change size between chained fills"
)]
pub struct VisitedSizeError {
    pub bitmap_width: usize,
    pub bitmap_height: usize,
    pub view_width: usize,
    pub view_height: usize,
}

/// Partitions the true cells of a boolean view into maximal connected areas.
///
/// The flood is an iterative depth-first walk with an explicit stack, so deep
/// components never recurse.
pub struct MapAreaFinder {
    adjacency: AdjacencyRule,
    visited: Option<Grid<bool>>,
}

impl MapAreaFinder {
    pub fn new(adjacency: AdjacencyRule) -> Self {
        Self { adjacency, visited: None }
    }

    /// All connected components of `view`, seeds scanned row-major. The
    /// visited state is rebuilt from scratch.
    pub fn map_areas<V: GridView<bool>>(&mut self, view: &V) -> Vec<Area> {
        self.visited = Some(Grid::new(view.width(), view.height()));
        let mut areas = Vec::new();
        for y in 0..view.height() as i32 {
            for x in 0..view.width() as i32 {
                let origin = Point::new(x, y);
                if let Some(area) = self.flood(view, origin) {
                    areas.push(area);
                }
            }
        }
        areas
    }

    /// Floods the single component containing `origin`, or `None` when the
    /// origin is false or already visited.
    ///
    /// With `clear_visited = false` the bitmap from previous calls is kept,
    /// letting callers pick off components one seed at a time; the view must
    /// keep its size for the retained bitmap to stay meaningful.
    pub fn fill_from<V: GridView<bool>>(
        &mut self,
        view: &V,
        origin: Point,
        clear_visited: bool,
    ) -> Result<Option<Area>, VisitedSizeError> {
        match &self.visited {
            Some(visited) if !clear_visited => {
                if visited.width() != view.width() || visited.height() != view.height() {
                    return Err(VisitedSizeError {
                        bitmap_width: visited.width(),
                        bitmap_height: visited.height(),
                        view_width: view.width(),
                        view_height: view.height(),
                    });
                }
            }
            _ => self.visited = Some(Grid::new(view.width(), view.height())),
        }
        Ok(self.flood(view, origin))
    }

    fn flood<V: GridView<bool>>(&mut self, view: &V, origin: Point) -> Option<Area> {
        let visited = self.visited.as_mut().expect("visited bitmap initialized by caller");
        if !view.contains(origin) || !view.get(origin) || visited.get(origin) {
            return None;
        }

        let mut area = Area::new();
        let mut stack = vec![origin];
        visited.set(origin, true);
        while let Some(pos) = stack.pop() {
            area.add(pos);
            for direction in self.adjacency.directions_of_neighbors() {
                let neighbor = pos + *direction;
                if !view.contains(neighbor) || visited.get(neighbor) || !view.get(neighbor) {
                    continue;
                }
                visited.set(neighbor, true);
                stack.push(neighbor);
            }
        }
        Some(area)
    }
}

/// One-shot component scan without keeping finder state around.
pub fn map_areas_for<V: GridView<bool>>(view: &V, adjacency: AdjacencyRule) -> Vec<Area> {
    MapAreaFinder::new(adjacency).map_areas(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> Grid<bool> {
        let mut grid = Grid::new(5, 5);
        for pos in [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(0, 1),
            Point::new(3, 3),
            Point::new(4, 4),
        ] {
            grid.set(pos, true);
        }
        grid
    }

    #[test]
    fn cardinal_adjacency_separates_diagonal_touches() {
        let grid = sample_view();
        let areas = map_areas_for(&grid, AdjacencyRule::Cardinals);

        assert_eq!(areas.len(), 3);
        assert_eq!(areas[0].len(), 3);
        assert!(areas[0].contains(Point::new(0, 0)));
        assert!(areas[0].contains(Point::new(1, 0)));
        assert!(areas[0].contains(Point::new(0, 1)));
        assert_eq!(areas[1].len(), 1);
        assert!(areas[1].contains(Point::new(3, 3)));
        assert_eq!(areas[2].len(), 1);
        assert!(areas[2].contains(Point::new(4, 4)));
    }

    #[test]
    fn eight_way_adjacency_merges_diagonal_touches() {
        let grid = sample_view();
        let areas = map_areas_for(&grid, AdjacencyRule::EightWay);

        assert_eq!(areas.len(), 2);
        assert!(areas[1].contains(Point::new(3, 3)));
        assert!(areas[1].contains(Point::new(4, 4)));
    }

    #[test]
    fn fill_from_respects_retained_visit_state() {
        let grid = sample_view();
        let mut finder = MapAreaFinder::new(AdjacencyRule::Cardinals);

        let first = finder.fill_from(&grid, Point::new(0, 0), true).unwrap();
        assert_eq!(first.map(|area| area.len()), Some(3));

        // Already visited, so no new area without clearing.
        assert_eq!(finder.fill_from(&grid, Point::new(1, 0), false).unwrap(), None);
        // Wall origin yields nothing either.
        assert_eq!(finder.fill_from(&grid, Point::new(2, 2), false).unwrap(), None);
        // An untouched component still floods.
        let second = finder.fill_from(&grid, Point::new(3, 3), false).unwrap();
        assert_eq!(second.map(|area| area.len()), Some(1));
    }

    #[test]
    fn chained_fill_rejects_resized_views() {
        let grid = sample_view();
        let mut finder = MapAreaFinder::new(AdjacencyRule::Cardinals);
        finder.fill_from(&grid, Point::new(0, 0), true).unwrap();

        let resized = Grid::<bool>::new(6, 5);
        let error = finder.fill_from(&resized, Point::new(0, 0), false).unwrap_err();
        assert_eq!(error.bitmap_width, 5);
        assert_eq!(error.view_width, 6);
    }
}
