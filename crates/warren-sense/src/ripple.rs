//! Ripple flood propagation with occluder-aware falloff.

use std::collections::VecDeque;

use warren_grid::math::scaled_atan2_approx;
use warren_grid::{AdjacencyRule, Grid, GridView, Point, SettableGridView};

use crate::source::SenseSource;

pub(crate) fn spread<V: GridView<f64>>(
    source: &mut SenseSource,
    resistance: &V,
    ripple_neighbors: usize,
) {
    let size = source.size();
    let center = Point::new(source.center(), source.center());
    let radius = source.radius();
    let intensity = source.intensity();
    let arc = if source.is_angle_restricted() {
        Some((source.angle_internal() / 360.0, source.span() / 360.0))
    } else {
        None
    };

    let mut near_light = Grid::<bool>::new(size, size);
    let mut queue = VecDeque::from([center]);
    while let Some(current) = queue.pop_front() {
        if source.buffer().get(current) <= 0.0 || near_light.get(current) {
            continue;
        }
        for &direction in AdjacencyRule::EightWay.directions_of_neighbors_clockwise() {
            let neighbor = current + direction;
            if !source.buffer().contains(neighbor) {
                continue;
            }
            let global = source.global_of(neighbor);
            if !resistance.contains(global) {
                continue;
            }
            if source.distance().between(center, neighbor) > radius {
                continue;
            }
            if let Some((arc_center, arc_span)) = arc {
                let proximity = (arc_center
                    - scaled_atan2_approx(
                        (neighbor.y - center.y) as f64,
                        (neighbor.x - center.x) as f64,
                    ))
                .abs();
                if proximity > arc_span * 0.5 && proximity < 1.0 - arc_span * 0.5 {
                    continue;
                }
            }

            let light = near_ripple_light(
                source,
                resistance,
                &mut near_light,
                neighbor,
                ripple_neighbors,
            );
            if light > source.buffer().get(neighbor) {
                source.buffer_mut().set(neighbor, light);
                // Re-examine open cells whose light increased.
                if resistance.get(global) < intensity {
                    queue.push_back(neighbor);
                }
            }
        }
    }
}

/// Light reaching `pos` from the `ripple_neighbors` of its surrounding cells
/// nearest the source, attenuated by distance and the contributors' own
/// resistance.
///
/// Ties on distance to the source keep the clockwise-from-up scan order. As a
/// side effect, `pos` is marked near-light when it is itself opaque or when
/// every lit contributor is indirect already, which stops the flood from
/// wrapping light around corners forever.
fn near_ripple_light<V: GridView<f64>>(
    source: &SenseSource,
    resistance: &V,
    near_light: &mut Grid<bool>,
    pos: Point,
    ripple_neighbors: usize,
) -> f64 {
    let center = Point::new(source.center(), source.center());
    if pos == center {
        return source.intensity();
    }

    let mut neighbors: Vec<(f64, Point)> = AdjacencyRule::EightWay
        .directions_of_neighbors_clockwise()
        .iter()
        .map(|&direction| pos + direction)
        .filter(|&neighbor| source.buffer().contains(neighbor))
        .map(|neighbor| (source.distance().between(center, neighbor), neighbor))
        .collect();
    neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("distances are finite"));
    neighbors.truncate(ripple_neighbors);

    let mut best = 0.0_f64;
    let mut lit = 0_usize;
    let mut indirect = 0_usize;
    for (_, neighbor) in neighbors {
        let neighbor_light = source.buffer().get(neighbor);
        if neighbor_light <= 0.0 {
            continue;
        }
        lit += 1;
        if near_light.get(neighbor) {
            indirect += 1;
        }
        let step = source.distance().between(pos, neighbor);
        let neighbor_resistance = if neighbor == center {
            0.0
        } else {
            resistance.get(source.global_of(neighbor))
        };
        best = best.max(neighbor_light - step * source.decay() - neighbor_resistance);
    }

    let own_resistance = resistance.get(source.global_of(pos));
    if own_resistance >= source.intensity() || indirect >= lit {
        near_light.set(pos, true);
    }
    best
}

#[cfg(test)]
mod tests {
    use warren_grid::Distance;

    use crate::source::{RippleType, SourceAlgorithm};

    use super::*;

    fn ripple_source(ripple_type: RippleType, radius: f64) -> SenseSource {
        SenseSource::new(
            SourceAlgorithm::Ripple(ripple_type),
            Point::new(10, 10),
            radius,
            Distance::Chebyshev,
        )
        .unwrap()
    }

    #[test]
    fn center_keeps_the_full_intensity_and_nothing_exceeds_it() {
        let resistance = Grid::<f64>::filled(21, 21, 0.0);
        let mut source = ripple_source(RippleType::Regular, 4.0);
        source.calculate(&resistance);

        assert_eq!(source.buffer().get(Point::new(4, 4)), 1.0);
        for local in source.buffer().positions() {
            assert!(source.buffer().get(local) <= 1.0, "cell {local:?} above the intensity");
        }
    }

    #[test]
    fn light_never_increases_away_from_the_center() {
        let resistance = Grid::<f64>::filled(21, 21, 0.0);
        let mut source = ripple_source(RippleType::Loose, 5.0);
        source.calculate(&resistance);

        let center = Point::new(5, 5);
        for local in source.buffer().positions() {
            let value = source.buffer().get(local);
            if value <= 0.0 || local == center {
                continue;
            }
            // Step one cell toward the center: light must not decrease.
            let toward = Point::new(
                local.x + (center.x - local.x).signum(),
                local.y + (center.y - local.y).signum(),
            );
            assert!(
                source.buffer().get(toward) >= value - 1e-9,
                "light increases stepping outward from {toward:?} to {local:?}"
            );
        }
    }

    #[test]
    fn walls_absorb_the_flood() {
        let mut resistance = Grid::<f64>::filled(21, 21, 0.0);
        // A vertical wall two cells right of the source.
        for y in 5..=15 {
            resistance.set(Point::new(12, y), 1.0);
        }
        let mut source = ripple_source(RippleType::Regular, 5.0);
        source.calculate(&resistance);

        assert!(
            source.buffer().get(source.local_of(Point::new(14, 10))) <= 0.0,
            "light passed through a solid wall"
        );
        assert!(source.buffer().get(source.local_of(Point::new(11, 10))) > 0.0);
    }

    #[test]
    fn tighter_spreads_light_no_more_cells_than_looser_ones() {
        let resistance = Grid::<f64>::filled(25, 25, 0.0);
        let mut lit_counts = Vec::new();
        for ripple_type in [RippleType::Tight, RippleType::Regular, RippleType::VeryLoose] {
            let mut source = SenseSource::new(
                SourceAlgorithm::Ripple(ripple_type),
                Point::new(12, 12),
                5.0,
                Distance::Euclidean,
            )
            .unwrap();
            source.calculate(&resistance);
            lit_counts
                .push(source.buffer().cells().iter().filter(|&&value| value > 0.0).count());
        }
        assert!(lit_counts[0] <= lit_counts[1]);
        assert!(lit_counts[1] <= lit_counts[2]);
    }
}
