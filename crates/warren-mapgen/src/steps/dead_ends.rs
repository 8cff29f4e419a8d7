//! Prunes dead-end corridor cells, with a chance to keep some.

use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{Area, Direction, Grid, GridView, Point, SettableGridView};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::rng::RogueRng;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Repeatedly fills unsaved dead ends back in, one tunnel area at a time.
///
/// A dead end survives either because its save roll succeeded (it stays
/// saved for all later passes) or because trimming its neighbors turned it
/// into a through-corridor. One stage per tunnel.
pub struct TunnelDeadEndTrimming<R: Rng = ChaCha8Rng> {
    pub name: String,
    rng: R,
    pub save_dead_end_chance: f64,
    /// Trim passes per tunnel; -1 keeps passing until a fixpoint.
    pub max_trim_iterations: i32,
    pub tunnels_tag: String,
    pub wall_floor_tag: String,
    tunnel_index: usize,
}

impl<R: Rng> TunnelDeadEndTrimming<R> {
    pub fn new(rng: R) -> Self {
        Self {
            name: "TunnelDeadEndTrimming".to_owned(),
            rng,
            save_dead_end_chance: 40.0,
            max_trim_iterations: -1,
            tunnels_tag: tags::TUNNELS.to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            tunnel_index: 0,
        }
    }
}

/// A floor cell whose only cardinal exit is `direction`: the two ring
/// neighbors beside it and the three cells opposite the exit are all wall.
fn is_dead_end(grid: &Grid<bool>, pos: Point) -> bool {
    if !grid.get(pos) {
        return false;
    }
    for exit in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
        let out = pos + exit;
        if !grid.contains(out) || !grid.get(out) {
            continue;
        }
        let mask_holds = (2..=6).all(|eighth_turns| {
            let masked = pos + exit.rotate(eighth_turns);
            !grid.contains(masked) || !grid.get(masked)
        });
        if mask_holds {
            return true;
        }
    }
    false
}

impl<R: Rng> GenerationStep for TunnelDeadEndTrimming<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<Area>>(Some(&self.tunnels_tag)),
            ComponentRequirement::of::<Grid<bool>>(Some(&self.wall_floor_tag)),
        ]
    }

    fn begin(&mut self, _context: &mut GenerationContext) -> Result<(), GenerationError> {
        if !(0.0..=100.0).contains(&self.save_dead_end_chance) {
            return Err(GenerationError::invalid(
                &self.name,
                "save_dead_end_chance",
                format!("must be within [0, 100], got {}", self.save_dead_end_chance),
            ));
        }
        if self.max_trim_iterations < -1 {
            return Err(GenerationError::invalid(
                &self.name,
                "max_trim_iterations",
                format!("must be -1 or non-negative, got {}", self.max_trim_iterations),
            ));
        }
        self.tunnel_index = 0;
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let tunnel_count = context
            .get_first::<ItemList<Area>>(Some(&self.tunnels_tag))
            .expect("checked by requirements")
            .len();
        if self.tunnel_index >= tunnel_count {
            return Ok(StepProgress::Complete);
        }
        let index = self.tunnel_index;
        self.tunnel_index += 1;

        let mut saved: HashSet<Point> = HashSet::new();
        let mut passes = 0_i32;
        loop {
            if self.max_trim_iterations >= 0 && passes >= self.max_trim_iterations {
                break;
            }
            passes += 1;

            let fresh: Vec<Point> = {
                let tunnels = context
                    .get_first::<ItemList<Area>>(Some(&self.tunnels_tag))
                    .expect("checked by requirements");
                let area = tunnels.get(index).expect("index bounded by tunnel count");
                let grid = context
                    .get_first::<Grid<bool>>(Some(&self.wall_floor_tag))
                    .expect("checked by requirements");
                area.iter()
                    .filter(|&pos| !saved.contains(&pos) && is_dead_end(grid, pos))
                    .collect()
            };
            if fresh.is_empty() {
                break;
            }

            let mut trimmed: Vec<Point> = Vec::new();
            for pos in fresh {
                if self.rng.percentage_check(self.save_dead_end_chance) {
                    saved.insert(pos);
                } else {
                    trimmed.push(pos);
                }
            }
            if trimmed.is_empty() {
                break;
            }

            let grid = context
                .get_first_mut::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            for &pos in &trimmed {
                grid.set(pos, false);
            }
            let tunnels = context
                .get_first_mut::<ItemList<Area>>(Some(&self.tunnels_tag))
                .expect("checked by requirements");
            let area = tunnels.get_mut(index).expect("index bounded by tunnel count");
            let trimmed_set: HashSet<Point> = trimmed.into_iter().collect();
            area.remove_where(|pos| trimmed_set.contains(&pos));
        }

        if self.tunnel_index >= tunnel_count {
            Ok(StepProgress::Complete)
        } else {
            Ok(StepProgress::Paused)
        }
    }
}
