//! Fills the whole map with one walled rectangle.

use warren_grid::{GridView, Point, SettableGridView};

use crate::context::{tags, GenerationContext};
use crate::error::GenerationError;
use crate::step::{GenerationStep, StepProgress};

use super::wall_floor_or_new;

/// Sets every interior cell to floor and the outer perimeter to wall, in one
/// pass with no stages.
pub struct RectangleGenerator {
    pub name: String,
    pub wall_floor_tag: String,
}

impl RectangleGenerator {
    pub fn new() -> Self {
        Self { name: "RectangleGenerator".to_owned(), wall_floor_tag: tags::WALL_FLOOR.to_owned() }
    }
}

impl Default for RectangleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationStep for RectangleGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let grid = wall_floor_or_new(context, &self.wall_floor_tag);
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        for y in 0..height {
            for x in 0..width {
                let interior = x > 0 && y > 0 && x < width - 1 && y < height - 1;
                grid.set(Point::new(x, y), interior);
            }
        }
        Ok(StepProgress::Complete)
    }
}
