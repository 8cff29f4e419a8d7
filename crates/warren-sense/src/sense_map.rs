//! Aggregation of many sources into one sensed field.

use std::collections::HashSet;

use rayon::prelude::*;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use warren_grid::{Grid, GridView, Point, SettableGridView};

use crate::source::SenseSource;

new_key_type! {
    /// Stable handle for a source registered in a sense map.
    pub struct SourceId;
}

/// Owns sense sources and the shared result view their buffers sum into.
///
/// Each calculation swaps the current/previous membership sets, so the
/// positions that newly entered or left the sensed field are always available
/// as set differences. With `parallel` enabled and at least two sources, the
/// per-source propagation runs on rayon workers; each source writes only its
/// own buffer, and the aggregation pass that follows is always sequential.
pub struct SenseMap<V: GridView<f64>> {
    resistance: V,
    result: Grid<f64>,
    sources: SlotMap<SourceId, SenseSource>,
    current: HashSet<Point>,
    previous: HashSet<Point>,
    parallel: bool,
}

impl<V: GridView<f64>> SenseMap<V> {
    pub fn new(resistance: V) -> Self {
        let result = Grid::filled(resistance.width(), resistance.height(), 0.0);
        Self {
            resistance,
            result,
            sources: SlotMap::with_key(),
            current: HashSet::new(),
            previous: HashSet::new(),
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn resistance_view(&self) -> &V {
        &self.resistance
    }

    pub fn resistance_view_mut(&mut self) -> &mut V {
        &mut self.resistance
    }

    pub fn add_sense_source(&mut self, source: SenseSource) -> SourceId {
        self.sources.insert(source)
    }

    pub fn remove_sense_source(&mut self, id: SourceId) -> Option<SenseSource> {
        self.sources.remove(id)
    }

    pub fn source(&self, id: SourceId) -> Option<&SenseSource> {
        self.sources.get(id)
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut SenseSource> {
        self.sources.get_mut(id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// The aggregated scalar field from the last calculation.
    pub fn result_view(&self) -> &Grid<f64> {
        &self.result
    }

    /// Positions sensed by the last calculation.
    pub fn current_sense_map(&self) -> &HashSet<Point> {
        &self.current
    }

    /// Positions sensed now but not by the previous calculation.
    pub fn newly_in_sense_map(&self) -> impl Iterator<Item = Point> + '_ {
        self.current.difference(&self.previous).copied()
    }

    /// Positions sensed by the previous calculation but no longer.
    pub fn newly_out_of_sense_map(&self) -> impl Iterator<Item = Point> + '_ {
        self.previous.difference(&self.current).copied()
    }

    /// Rolls the membership sets over and zeroes the result view, resizing it
    /// when the resistance view's dimensions changed.
    pub fn reset(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
        if self.result.width() != self.resistance.width()
            || self.result.height() != self.resistance.height()
        {
            self.result = Grid::filled(self.resistance.width(), self.resistance.height(), 0.0);
        } else {
            self.result.fill(0.0);
        }
    }
}

impl<V: GridView<f64> + Sync> SenseMap<V> {
    /// Resets, recalculates every enabled source, and stamps the buffers into
    /// the result view in registration order.
    pub fn calculate(&mut self) {
        self.reset();

        let resistance = &self.resistance;
        let mut sources: Vec<&mut SenseSource> = self.sources.values_mut().collect();
        if self.parallel && sources.len() > 1 {
            sources.par_iter_mut().for_each(|source| source.calculate(resistance));
        } else {
            for source in sources.iter_mut() {
                source.calculate(resistance);
            }
        }

        for source in sources {
            let reach = source.radius().floor() as i32;
            let center = source.center();
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    let global = source.position() + Point::new(dx, dy);
                    if !self.result.contains(global) {
                        continue;
                    }
                    let value = source.buffer().get(Point::new(center + dx, center + dy));
                    if value == 0.0 {
                        continue;
                    }
                    self.result.set(global, self.result.get(global) + value);
                    if self.result.get(global) > 0.0 {
                        self.current.insert(global);
                    }
                }
            }
        }
        debug!(sources = self.sources.len(), sensed = self.current.len(), "sense map recalculated");
    }
}
