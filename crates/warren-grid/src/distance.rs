//! Distance metrics over the lattice.

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyRule;
use crate::point::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distance {
    Manhattan,
    Chebyshev,
    Euclidean,
}

impl Distance {
    /// Distance of the displacement `(dx, dy)` from the origin.
    pub fn calculate(self, dx: f64, dy: f64) -> f64 {
        let dx = dx.abs();
        let dy = dy.abs();
        match self {
            Distance::Manhattan => dx + dy,
            Distance::Chebyshev => dx.max(dy),
            Distance::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }

    pub fn between(self, a: Point, b: Point) -> f64 {
        self.calculate((b.x - a.x) as f64, (b.y - a.y) as f64)
    }

    /// The adjacency rule under which a unit step has distance one.
    pub fn adjacency_rule(self) -> AdjacencyRule {
        match self {
            Distance::Manhattan => AdjacencyRule::Cardinals,
            Distance::Chebyshev | Distance::Euclidean => AdjacencyRule::EightWay,
        }
    }
}
