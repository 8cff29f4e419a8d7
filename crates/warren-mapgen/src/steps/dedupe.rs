//! Removes points that already belong to another area list.

use std::collections::HashSet;

use warren_grid::{Area, Point};

use crate::context::{GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Strips from every area in the modified list any point that already exists
/// in the unmodified list, or in an earlier area of the modified list itself.
pub struct RemoveDuplicatePoints {
    pub name: String,
    pub unmodified_list_tag: String,
    pub modified_list_tag: String,
}

impl RemoveDuplicatePoints {
    pub fn new(unmodified_list_tag: &str, modified_list_tag: &str) -> Self {
        Self {
            name: "RemoveDuplicatePoints".to_owned(),
            unmodified_list_tag: unmodified_list_tag.to_owned(),
            modified_list_tag: modified_list_tag.to_owned(),
        }
    }
}

impl GenerationStep for RemoveDuplicatePoints {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<Area>>(Some(&self.unmodified_list_tag)),
            ComponentRequirement::of::<ItemList<Area>>(Some(&self.modified_list_tag)),
        ]
    }

    fn begin(&mut self, _context: &mut GenerationContext) -> Result<(), GenerationError> {
        if self.unmodified_list_tag == self.modified_list_tag {
            return Err(GenerationError::invalid(
                &self.name,
                "modified_list_tag",
                format!(
                    "the unmodified and modified list tags must differ, both are {:?}",
                    self.modified_list_tag
                ),
            ));
        }
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let mut seen: HashSet<Point> = context
            .get_first::<ItemList<Area>>(Some(&self.unmodified_list_tag))
            .expect("checked by requirements")
            .iter()
            .flat_map(|area| area.iter())
            .collect();

        let modified = context
            .get_first_mut::<ItemList<Area>>(Some(&self.modified_list_tag))
            .expect("checked by requirements");
        for area in modified.iter_mut() {
            area.remove_where(|pos| seen.contains(&pos));
            seen.extend(area.iter());
        }
        Ok(StepProgress::Complete)
    }
}
