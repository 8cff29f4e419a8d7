//! Seeds a boolean view with random noise.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{GridView, Point, SettableGridView};

use crate::context::{tags, GenerationContext};
use crate::error::GenerationError;
use crate::rng::RogueRng;
use crate::step::{GenerationStep, StepProgress};

use super::wall_floor_or_new;

/// Fills each cell with floor at `fill_probability` percent, optionally
/// leaving the perimeter untouched and pausing every
/// `fills_between_pauses` processed cells (0 never pauses).
pub struct RandomViewFill<R: Rng = ChaCha8Rng> {
    pub name: String,
    rng: R,
    pub fill_probability: f64,
    pub exclude_perimeter_points: bool,
    pub fills_between_pauses: u32,
    pub wall_floor_tag: String,
    cursor: usize,
}

impl<R: Rng> RandomViewFill<R> {
    pub fn new(rng: R) -> Self {
        Self {
            name: "RandomViewFill".to_owned(),
            rng,
            fill_probability: 50.0,
            exclude_perimeter_points: true,
            fills_between_pauses: 0,
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            cursor: 0,
        }
    }
}

impl<R: Rng> GenerationStep for RandomViewFill<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, _context: &mut GenerationContext) -> Result<(), GenerationError> {
        if !(0.0..=100.0).contains(&self.fill_probability) {
            return Err(GenerationError::invalid(
                &self.name,
                "fill_probability",
                format!("must be within [0, 100], got {}", self.fill_probability),
            ));
        }
        self.cursor = 0;
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let grid = wall_floor_or_new(context, &self.wall_floor_tag);
        let width = grid.width();
        let height = grid.height();
        let total = width * height;

        let mut processed = 0_u32;
        while self.cursor < total {
            let pos = Point::new((self.cursor % width) as i32, (self.cursor / width) as i32);
            self.cursor += 1;
            if self.exclude_perimeter_points
                && (pos.x == 0
                    || pos.y == 0
                    || pos.x == width as i32 - 1
                    || pos.y == height as i32 - 1)
            {
                continue;
            }
            let floor = self.rng.percentage_check(self.fill_probability);
            grid.set(pos, floor);
            processed += 1;
            if self.fills_between_pauses != 0 && processed >= self.fills_between_pauses {
                return Ok(StepProgress::Paused);
            }
        }
        Ok(StepProgress::Complete)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use warren_grid::{Grid, GridView};

    use super::*;

    #[test]
    fn fill_respects_the_perimeter_exclusion() {
        let mut context = GenerationContext::new(20, 20);
        let mut step = RandomViewFill::new(ChaCha8Rng::seed_from_u64(5));
        step.fill_probability = 100.0;
        step.perform(&mut context).unwrap();

        let grid = context.get_first::<Grid<bool>>(Some(tags::WALL_FLOOR)).unwrap();
        for pos in grid.positions() {
            let perimeter = pos.x == 0 || pos.y == 0 || pos.x == 19 || pos.y == 19;
            assert_eq!(grid.get(pos), !perimeter, "cell {pos:?}");
        }
    }

    #[test]
    fn pause_cadence_yields_between_batches() {
        let mut context = GenerationContext::new(12, 12);
        let mut step = RandomViewFill::new(ChaCha8Rng::seed_from_u64(5));
        step.fills_between_pauses = 25;
        step.begin(&mut context).unwrap();

        let mut pauses = 0;
        while step.advance(&mut context).unwrap() == StepProgress::Paused {
            pauses += 1;
        }
        // 100 interior cells at 25 per batch; the fourth batch ends exactly on
        // the last interior cell, leaving only perimeter skips for the final
        // advance.
        assert_eq!(pauses, 4);
    }

    #[test]
    fn out_of_range_probability_is_a_configuration_error() {
        let mut context = GenerationContext::new(8, 8);
        let mut step = RandomViewFill::new(ChaCha8Rng::seed_from_u64(5));
        step.fill_probability = 140.0;
        let error = step.perform(&mut context).unwrap_err();
        assert!(matches!(error, GenerationError::InvalidConfiguration { .. }));
    }
}
