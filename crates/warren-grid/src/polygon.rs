//! Lattice polygons with rasterized edges and even-odd interiors.

use std::collections::HashSet;
use std::f64::consts::TAU;

use thiserror::Error;

use crate::area::Area;
use crate::lines::{self, LineAlgorithm};
use crate::multi_area::MultiArea;
use crate::point::Point;
use crate::rect::Rectangle;

#[derive(Debug, Error, PartialEq)]
pub enum PolygonError {
    #[error("a polygon requires at least three corners, got {0}")]
    TooFewCorners(usize),
    #[error("a regular shape requires at least three sides, got {0}")]
    TooFewSides(usize),
    #[error("shape radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}

/// An immutable polygon rasterized onto the lattice.
///
/// The outer edge holds one [`Area`] per side segment in corner declaration
/// order; adjacent segments share their corner cell. The interior is filled
/// with a scanline even-odd rule and never touches the outer edge.
#[derive(Clone, Debug)]
pub struct PolygonArea {
    corners: Vec<Point>,
    algorithm: LineAlgorithm,
    edges: Vec<Area>,
    inner: Area,
}

impl PolygonArea {
    pub fn new(
        corners: impl IntoIterator<Item = Point>,
        algorithm: LineAlgorithm,
    ) -> Result<Self, PolygonError> {
        let corners: Vec<Point> = corners.into_iter().collect();
        if corners.len() < 3 {
            return Err(PolygonError::TooFewCorners(corners.len()));
        }

        let edges = rasterize_edges(&corners, algorithm);
        let inner = fill_interior(&corners, &edges);
        Ok(Self { corners, algorithm, edges, inner })
    }

    pub fn corners(&self) -> &[Point] {
        &self.corners
    }

    pub fn outer_edge(&self) -> MultiArea<'_> {
        self.edges.iter().collect()
    }

    pub fn inner_points(&self) -> &Area {
        &self.inner
    }

    /// Every point of the polygon: the edge segments in order, then the
    /// interior. Corner cells shared by two segments appear once per segment.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.edges.iter().flat_map(|edge| edge.iter()).chain(self.inner.iter())
    }

    pub fn count(&self) -> usize {
        self.edges.iter().map(|edge| edge.len()).sum::<usize>() + self.inner.len()
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.inner.contains(pos) || self.edges.iter().any(|edge| edge.contains(pos))
    }

    pub fn bounds(&self) -> Rectangle {
        let mut bounds = Rectangle::new(self.corners[0].x, self.corners[0].y, 1, 1);
        for &corner in &self.corners[1..] {
            bounds = bounds.union(Rectangle::new(corner.x, corner.y, 1, 1));
        }
        bounds
    }

    /// Cyclic, direction-sensitive equality: some rotation of `other`'s
    /// corner list must equal this polygon's corner list exactly. A mirrored
    /// corner order does not match.
    pub fn matches(&self, other: &PolygonArea) -> bool {
        let n = self.corners.len();
        if n != other.corners.len() {
            return false;
        }
        (0..n).any(|offset| {
            (0..n).all(|i| self.corners[i] == other.corners[(offset + i) % n])
        })
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        self.map_corners(|corner| corner.translate(dx, dy))
    }

    /// Rotates by `degrees` clockwise around `origin`, defaulting to the
    /// center of the polygon's bounds. Corners are rounded back onto the
    /// lattice.
    pub fn rotate(&self, degrees: f64, origin: Option<Point>) -> Self {
        let origin = origin.unwrap_or_else(|| self.bounds().center());
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        self.map_corners(|corner| {
            let dx = (corner.x - origin.x) as f64;
            let dy = (corner.y - origin.y) as f64;
            Point::new(
                origin.x + (dx * cos - dy * sin).round() as i32,
                origin.y + (dx * sin + dy * cos).round() as i32,
            )
        })
    }

    /// Mirrors across the vertical line `x = axis_x`.
    pub fn flip_horizontal(&self, axis_x: i32) -> Self {
        self.map_corners(|corner| Point::new(2 * axis_x - corner.x, corner.y))
    }

    /// Mirrors across the horizontal line `y = axis_y`.
    pub fn flip_vertical(&self, axis_y: i32) -> Self {
        self.map_corners(|corner| Point::new(corner.x, 2 * axis_y - corner.y))
    }

    /// Swaps x and y relative to `axis`.
    pub fn transpose(&self, axis: Point) -> Self {
        self.map_corners(|corner| {
            Point::new(axis.x + (corner.y - axis.y), axis.y + (corner.x - axis.x))
        })
    }

    fn map_corners(&self, transform: impl Fn(Point) -> Point) -> Self {
        let corners: Vec<Point> = self.corners.iter().map(|&corner| transform(corner)).collect();
        Self::new(corners, self.algorithm).expect("transform preserves the corner count")
    }

    /// A polygon covering `rect`, corners declared clockwise from the
    /// top-left.
    pub fn rectangle(rect: Rectangle, algorithm: LineAlgorithm) -> Result<Self, PolygonError> {
        Self::new(
            [
                rect.min_extent(),
                Point::new(rect.right(), rect.y),
                rect.max_extent(),
                Point::new(rect.x, rect.bottom()),
            ],
            algorithm,
        )
    }

    /// A parallelogram anchored at `origin`, slanting right when `from_top`
    /// and left otherwise.
    pub fn parallelogram(
        origin: Point,
        width: i32,
        height: i32,
        from_top: bool,
        algorithm: LineAlgorithm,
    ) -> Result<Self, PolygonError> {
        let skew = if from_top { height } else { -height };
        Self::new(
            [
                origin,
                origin.translate(width, 0),
                origin.translate(width + skew, height),
                origin.translate(skew, height),
            ],
            algorithm,
        )
    }

    /// A regular polygon of `sides` corners on a circle of `radius` around
    /// `center`, the first corner pointing up.
    pub fn regular_polygon(
        center: Point,
        sides: usize,
        radius: f64,
        algorithm: LineAlgorithm,
    ) -> Result<Self, PolygonError> {
        if sides < 3 {
            return Err(PolygonError::TooFewSides(sides));
        }
        if radius <= 0.0 {
            return Err(PolygonError::NonPositiveRadius(radius));
        }
        let corners = (0..sides).map(|i| {
            let theta = -TAU / 4.0 + (i as f64) * TAU / (sides as f64);
            ring_point(center, radius, theta)
        });
        Self::new(corners.collect::<Vec<_>>(), algorithm)
    }

    /// A star of `points` tips alternating between `outer_radius` and
    /// `inner_radius` around `center`.
    pub fn regular_star(
        center: Point,
        points: usize,
        outer_radius: f64,
        inner_radius: f64,
        algorithm: LineAlgorithm,
    ) -> Result<Self, PolygonError> {
        if points < 3 {
            return Err(PolygonError::TooFewSides(points));
        }
        if outer_radius <= 0.0 {
            return Err(PolygonError::NonPositiveRadius(outer_radius));
        }
        if inner_radius <= 0.0 {
            return Err(PolygonError::NonPositiveRadius(inner_radius));
        }
        let corners = (0..points * 2).map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let theta = -TAU / 4.0 + (i as f64) * TAU / ((points * 2) as f64);
            ring_point(center, radius, theta)
        });
        Self::new(corners.collect::<Vec<_>>(), algorithm)
    }
}

fn ring_point(center: Point, radius: f64, theta: f64) -> Point {
    Point::new(
        center.x + (radius * theta.cos()).round() as i32,
        center.y + (radius * theta.sin()).round() as i32,
    )
}

fn rasterize_edges(corners: &[Point], algorithm: LineAlgorithm) -> Vec<Area> {
    (0..corners.len())
        .map(|i| {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            lines::line(start, end, algorithm).into_iter().collect()
        })
        .collect()
}

/// Scanline even-odd fill.
///
/// Rows strictly between the extreme y values are scanned left to right; a
/// boundary cell is attributed to a segment only when one of that segment's
/// endpoints lies strictly above the row, and a cell is interior when the
/// number of distinct segments met so far on the row is odd.
fn fill_interior(corners: &[Point], edges: &[Area]) -> Area {
    let min_x = corners.iter().map(|corner| corner.x).min().expect("corners are non-empty");
    let max_x = corners.iter().map(|corner| corner.x).max().expect("corners are non-empty");
    let min_y = corners.iter().map(|corner| corner.y).min().expect("corners are non-empty");
    let max_y = corners.iter().map(|corner| corner.y).max().expect("corners are non-empty");

    let n = corners.len();
    let mut inner = Area::new();
    for y in (min_y + 1)..max_y {
        let mut segments_met: HashSet<usize> = HashSet::new();
        for x in min_x..max_x {
            let pos = Point::new(x, y);
            let mut on_edge = false;
            for (index, edge) in edges.iter().enumerate() {
                if !edge.contains(pos) {
                    continue;
                }
                on_edge = true;
                let start = corners[index];
                let end = corners[(index + 1) % n];
                if start.y < y || end.y < y {
                    segments_met.insert(index);
                }
            }
            if !on_edge && segments_met.len() % 2 == 1 {
                inner.add(pos);
            }
        }
    }
    inner
}
