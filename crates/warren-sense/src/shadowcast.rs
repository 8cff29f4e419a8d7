//! Recursive shadowcasting over the eight octants.

use warren_grid::math::scaled_atan2_approx;
use warren_grid::{GridView, Point, SettableGridView};

use crate::source::SenseSource;

/// Octant transforms mapping the canonical scan onto the full circle.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

pub(crate) fn spread<V: GridView<f64>>(source: &mut SenseSource, resistance: &V) {
    let arc = if source.is_angle_restricted() {
        Some(Arc { center: source.angle_internal() / 360.0, span: source.span() / 360.0 })
    } else {
        None
    };
    for octant in OCTANTS {
        scan_octant(source, resistance, 1, 1.0, 0.0, octant, arc);
    }
}

#[derive(Clone, Copy)]
struct Arc {
    center: f64,
    span: f64,
}

impl Arc {
    /// Whether the buffer offset `(dx, dy)` from the center falls inside the
    /// arc, boundary inclusive.
    fn contains(self, dx: i32, dy: i32) -> bool {
        let proximity = (self.center - scaled_atan2_approx(dy as f64, dx as f64)).abs();
        proximity <= self.span * 0.5 || proximity >= 1.0 - self.span * 0.5
    }
}

/// One octant scan between the `start` and `end` slopes.
///
/// Rows run outward from `row` to the radius; when a blocking cell ends, the
/// scan resumes at the slope remembered in `new_start`, and when one begins,
/// the still-open part of the row spawns a recursive scan bounded by the
/// blocker's left slope.
fn scan_octant<V: GridView<f64>>(
    source: &mut SenseSource,
    resistance: &V,
    row: i32,
    mut start: f64,
    end: f64,
    octant: (i32, i32, i32, i32),
    arc: Option<Arc>,
) {
    if start < end {
        return;
    }
    let (xx, xy, yx, yy) = octant;
    let center = source.center();
    let size = source.size() as i32;
    let radius = source.radius();
    let intensity = source.intensity();
    let decay = source.decay();
    let metric = source.distance();

    let mut new_start = 0.0;
    let mut blocked = false;
    let mut distance = row;
    while distance as f64 <= radius && !blocked {
        let delta_y = -distance;
        for delta_x in -distance..=0 {
            let current_x = center + delta_x * xx + delta_y * xy;
            let current_y = center + delta_x * yx + delta_y * yy;
            let left_slope = (delta_x as f64 - 0.5) / (delta_y as f64 + 0.5);
            let right_slope = (delta_x as f64 + 0.5) / (delta_y as f64 - 0.5);

            let in_buffer =
                current_x >= 0 && current_y >= 0 && current_x < size && current_y < size;
            if !in_buffer || start < right_slope {
                continue;
            }
            if end > left_slope {
                break;
            }

            let local = Point::new(current_x, current_y);
            let global = source.global_of(local);
            let in_view = resistance.contains(global);
            let delta_radius = metric.calculate(delta_x as f64, delta_y as f64);

            if delta_radius <= radius
                && in_view
                && arc.map_or(true, |arc| arc.contains(current_x - center, current_y - center))
            {
                source.buffer_mut().set(local, intensity - decay * delta_radius);
            }

            // Cells outside the resistance view block like walls.
            let blocking = !in_view || resistance.get(global) >= intensity;
            if blocked {
                if blocking {
                    new_start = right_slope;
                } else {
                    blocked = false;
                    start = new_start;
                }
            } else if blocking && (distance as f64) < radius {
                blocked = true;
                scan_octant(source, resistance, distance + 1, start, left_slope, octant, arc);
                new_start = right_slope;
            }
        }
        distance += 1;
    }
}

#[cfg(test)]
mod tests {
    use warren_grid::{Distance, Grid};

    use crate::source::SourceAlgorithm;

    use super::*;

    fn open_field_source(radius: f64, position: Point) -> SenseSource {
        SenseSource::new(
            SourceAlgorithm::RecursiveShadowcasting,
            position,
            radius,
            Distance::Chebyshev,
        )
        .unwrap()
    }

    #[test]
    fn transparent_field_is_fully_lit_within_the_radius() {
        let resistance = Grid::<f64>::filled(21, 21, 0.0);
        let mut source = open_field_source(3.0, Point::new(10, 10));
        source.calculate(&resistance);

        for dy in -3_i32..=3 {
            for dx in -3_i32..=3 {
                let local = Point::new(3 + dx, 3 + dy);
                let chebyshev = dx.abs().max(dy.abs()) as f64;
                let expected = 1.0 - 0.25 * chebyshev;
                let actual = source.buffer().get(local);
                assert!(
                    (actual - expected).abs() < 1e-9,
                    "offset ({dx}, {dy}): expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn walls_cast_shadows_away_from_the_source() {
        let mut resistance = Grid::<f64>::filled(21, 21, 0.0);
        resistance.set(Point::new(12, 10), 1.0);
        let mut source = open_field_source(5.0, Point::new(10, 10));
        source.calculate(&resistance);

        // The wall cell is lit, the cells straight behind it are dark.
        assert!(source.buffer().get(source.local_of(Point::new(12, 10))) > 0.0);
        for x in 13..=15 {
            assert_eq!(
                source.buffer().get(source.local_of(Point::new(x, 10))),
                0.0,
                "cell ({x}, 10) should be shadowed"
            );
        }
        // Off-axis cells beside the shadow stay lit.
        assert!(source.buffer().get(source.local_of(Point::new(13, 12))) > 0.0);
    }

    #[test]
    fn weak_resistance_is_fully_transparent() {
        let mut resistance = Grid::<f64>::filled(21, 21, 0.0);
        resistance.set(Point::new(12, 10), 0.99);
        let mut source = open_field_source(5.0, Point::new(10, 10));
        source.calculate(&resistance);

        assert!(
            source.buffer().get(source.local_of(Point::new(14, 10))) > 0.0,
            "resistance below the intensity must not block"
        );
    }

    #[test]
    fn angle_restriction_limits_light_to_the_arc() {
        let resistance = Grid::<f64>::filled(21, 21, 0.0);
        let mut source = open_field_source(5.0, Point::new(10, 10));
        source.set_angle(0.0);
        source.set_span(90.0).unwrap();
        source.calculate(&resistance);

        // Facing up with a quarter span: cells above are lit, cells below are
        // not.
        assert!(source.buffer().get(source.local_of(Point::new(10, 7))) > 0.0);
        assert_eq!(source.buffer().get(source.local_of(Point::new(10, 13))), 0.0);
        assert_eq!(source.buffer().get(source.local_of(Point::new(15, 10))), 0.0);
        // The source cell itself stays at full intensity.
        assert_eq!(source.buffer().get(Point::new(5, 5)), 1.0);
    }

    #[test]
    fn cells_beyond_the_radius_stay_dark() {
        let resistance = Grid::<f64>::filled(31, 31, 0.0);
        let mut source = SenseSource::new(
            SourceAlgorithm::RecursiveShadowcasting,
            Point::new(15, 15),
            4.0,
            Distance::Euclidean,
        )
        .unwrap();
        source.calculate(&resistance);

        for local in source.buffer().positions() {
            let dx = (local.x - 4) as f64;
            let dy = (local.y - 4) as f64;
            if (dx * dx + dy * dy).sqrt() > 4.0 {
                assert_eq!(source.buffer().get(local), 0.0, "cell {local:?} beyond the radius");
            }
        }
    }
}
