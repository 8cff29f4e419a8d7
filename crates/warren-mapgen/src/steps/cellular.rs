//! Cellular-automata smoothing for cave layouts.

use warren_grid::{map_areas_for, AdjacencyRule, Grid, GridView, Point, SettableGridView};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{GenerationStep, StepProgress};

use super::wall_floor_or_new;

/// Smooths random noise into caves, one iteration per stage.
///
/// Early iterations (below `cutoff_big_area_fill`) also break up large open
/// chambers by requiring nearby walls at radius two; later iterations only
/// smooth. After the final iteration the outer perimeter is forced to wall
/// and the resulting caves are appended to the area list under
/// `area_adjacency_rule`.
pub struct CellularAutomataAreaGeneration {
    pub name: String,
    pub wall_floor_tag: String,
    pub areas_tag: String,
    pub area_adjacency_rule: AdjacencyRule,
    pub total_iterations: u32,
    pub cutoff_big_area_fill: u32,
    iteration: u32,
}

impl CellularAutomataAreaGeneration {
    pub fn new() -> Self {
        Self {
            name: "CellularAutomataAreaGeneration".to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            areas_tag: tags::AREAS.to_owned(),
            area_adjacency_rule: AdjacencyRule::Cardinals,
            total_iterations: 10,
            cutoff_big_area_fill: 4,
            iteration: 0,
        }
    }
}

impl Default for CellularAutomataAreaGeneration {
    fn default() -> Self {
        Self::new()
    }
}

fn count_walls_near(snapshot: &Grid<bool>, center: Point, radius: i32) -> u32 {
    let mut walls = 0;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            let pos = Point::new(center.x + dx, center.y + dy);
            if snapshot.contains(pos) && !snapshot.get(pos) {
                walls += 1;
            }
        }
    }
    walls
}

impl GenerationStep for CellularAutomataAreaGeneration {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        if self.cutoff_big_area_fill > self.total_iterations {
            return Err(GenerationError::invalid(
                &self.name,
                "cutoff_big_area_fill",
                format!(
                    "cutoff_big_area_fill ({}) must not exceed total_iterations ({})",
                    self.cutoff_big_area_fill, self.total_iterations
                ),
            ));
        }
        wall_floor_or_new(context, &self.wall_floor_tag);
        self.iteration = 0;
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        if self.iteration < self.total_iterations {
            let break_up_big_areas = self.iteration < self.cutoff_big_area_fill;
            let grid = wall_floor_or_new(context, &self.wall_floor_tag);
            let snapshot = grid.clone();
            let width = grid.width() as i32;
            let height = grid.height() as i32;
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let pos = Point::new(x, y);
                    let near_walls = count_walls_near(&snapshot, pos, 1);
                    let floor = if break_up_big_areas {
                        near_walls < 5 && count_walls_near(&snapshot, pos, 2) > 2
                    } else {
                        near_walls < 5
                    };
                    grid.set(pos, floor);
                }
            }
            self.iteration += 1;
            return Ok(StepProgress::Paused);
        }

        let areas = {
            let grid = wall_floor_or_new(context, &self.wall_floor_tag);
            for pos in grid.bounds().perimeter_positions() {
                grid.set(pos, false);
            }
            map_areas_for(&*grid, self.area_adjacency_rule)
        };
        context
            .get_first_or_new(Some(self.areas_tag.as_str()), ItemList::new)
            .extend(areas, &self.name);
        Ok(StepProgress::Complete)
    }
}
