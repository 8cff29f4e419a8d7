//! Line rasterization over the lattice.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Selects how a segment is turned into lattice cells.
///
/// `Bresenham` produces the classic 8-connected line; `Orthogonal` refuses
/// diagonal steps and is therefore 4-connected, one cell longer per diagonal
/// run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineAlgorithm {
    Bresenham,
    Orthogonal,
}

pub fn line(start: Point, end: Point, algorithm: LineAlgorithm) -> Vec<Point> {
    match algorithm {
        LineAlgorithm::Bresenham => bresenham(start, end),
        LineAlgorithm::Orthogonal => orthogonal(start, end),
    }
}

/// 8-connected raster of the segment from `start` to `end`, inclusive.
pub fn bresenham(start: Point, end: Point) -> Vec<Point> {
    let mut points = Vec::new();
    let mut x = start.x;
    let mut y = start.y;
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = (end.x - start.x).signum();
    let sy = (end.y - start.y).signum();
    let mut error = dx + dy;

    loop {
        points.push(Point::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += sx;
        }
        if doubled <= dx {
            error += dx;
            y += sy;
        }
    }
    points
}

/// 4-connected raster of the segment from `start` to `end`, inclusive.
///
/// Steps alternate between the axes so the walk stays as close to the ideal
/// segment as possible without ever moving diagonally.
pub fn orthogonal(start: Point, end: Point) -> Vec<Point> {
    let total_dist_x = (end.x - start.x).abs();
    let total_dist_y = (end.y - start.y).abs();
    let sx = (end.x - start.x).signum();
    let sy = (end.y - start.y).signum();

    let mut x = start.x;
    let mut y = start.y;
    let mut current_step_x = 0;
    let mut current_step_y = 0;

    let mut points = Vec::with_capacity((total_dist_x + total_dist_y + 1) as usize);
    points.push(start);
    while current_step_x < total_dist_x || current_step_y < total_dist_y {
        if (1 + 2 * current_step_x) * total_dist_y < (1 + 2 * current_step_y) * total_dist_x {
            x += sx;
            current_step_x += 1;
        } else {
            y += sy;
            current_step_y += 1;
        }
        points.push(Point::new(x, y));
    }
    points
}
