//! Collects the map's connected regions into the area list.

use warren_grid::{map_areas_for, AdjacencyRule, Grid};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Runs connected-component discovery over the wall-floor grid and appends
/// every region found.
pub struct AreaFinder {
    pub name: String,
    pub wall_floor_tag: String,
    pub areas_tag: String,
    pub adjacency: AdjacencyRule,
}

impl AreaFinder {
    pub fn new(adjacency: AdjacencyRule) -> Self {
        Self {
            name: "AreaFinder".to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            areas_tag: tags::AREAS.to_owned(),
            adjacency,
        }
    }
}

impl GenerationStep for AreaFinder {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![ComponentRequirement::of::<Grid<bool>>(Some(&self.wall_floor_tag))]
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let areas = {
            let grid = context
                .get_first::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            map_areas_for(grid, self.adjacency)
        };
        context
            .get_first_or_new(Some(self.areas_tag.as_str()), ItemList::new)
            .extend(areas, &self.name);
        Ok(StepProgress::Complete)
    }
}
