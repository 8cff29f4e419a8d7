//! Translates rectangle lists into area lists.

use warren_grid::{Area, Rectangle};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Appends one [`Area`] per recorded rectangle, covering the same cells.
pub struct RectanglesToAreas {
    pub name: String,
    pub rectangles_tag: String,
    pub areas_tag: String,
}

impl RectanglesToAreas {
    pub fn new() -> Self {
        Self {
            name: "RectanglesToAreas".to_owned(),
            rectangles_tag: tags::ROOMS.to_owned(),
            areas_tag: tags::AREAS.to_owned(),
        }
    }
}

impl Default for RectanglesToAreas {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationStep for RectanglesToAreas {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![ComponentRequirement::of::<ItemList<Rectangle>>(Some(&self.rectangles_tag))]
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let areas: Vec<Area> = context
            .get_first::<ItemList<Rectangle>>(Some(&self.rectangles_tag))
            .expect("checked by requirements")
            .iter()
            .map(|rect| rect.positions().collect())
            .collect();
        context
            .get_first_or_new(Some(self.areas_tag.as_str()), ItemList::new)
            .extend(areas, &self.name);
        Ok(StepProgress::Complete)
    }
}

#[cfg(test)]
mod tests {
    use warren_grid::Point;

    use super::*;

    #[test]
    fn every_rectangle_becomes_an_equal_sized_area() {
        let mut context = GenerationContext::new(20, 20);
        let mut rooms = ItemList::new();
        rooms.add(Rectangle::new(2, 2, 3, 2), "fixture");
        rooms.add(Rectangle::new(10, 10, 2, 2), "fixture");
        context.add(rooms, Some(tags::ROOMS)).unwrap();

        RectanglesToAreas::new().perform(&mut context).unwrap();

        let areas = context.get_first::<ItemList<Area>>(Some(tags::AREAS)).unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas.get(0).unwrap().len(), 6);
        assert!(areas.get(0).unwrap().contains(Point::new(4, 3)));
        assert_eq!(areas.entries()[0].source_step, "RectanglesToAreas");
    }
}
