//! Records existing openings in room walls as doors.

use warren_grid::{Grid, GridView, Rectangle};

use crate::context::{tags, DoorList, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Scans each room's one-cell expansion perimeter and records every floor
/// cell found there as a door for that room.
pub struct DoorFinder {
    pub name: String,
    pub rooms_tag: String,
    pub wall_floor_tag: String,
    pub doors_tag: String,
}

impl DoorFinder {
    pub fn new() -> Self {
        Self {
            name: "DoorFinder".to_owned(),
            rooms_tag: tags::ROOMS.to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            doors_tag: tags::DOORS.to_owned(),
        }
    }
}

impl Default for DoorFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationStep for DoorFinder {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<Rectangle>>(Some(&self.rooms_tag)),
            ComponentRequirement::of::<Grid<bool>>(Some(&self.wall_floor_tag)),
        ]
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let found: Vec<(Rectangle, Vec<_>)> = {
            let rooms = context
                .get_first::<ItemList<Rectangle>>(Some(&self.rooms_tag))
                .expect("checked by requirements");
            let grid = context
                .get_first::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            rooms
                .iter()
                .map(|&room| {
                    let doors = room
                        .expand(1, 1)
                        .perimeter_positions()
                        .into_iter()
                        .filter(|&pos| grid.contains(pos) && grid.get(pos))
                        .collect();
                    (room, doors)
                })
                .collect()
        };

        let door_list = context.get_first_or_new(Some(self.doors_tag.as_str()), DoorList::new);
        for (room, doors) in found {
            for door in doors {
                door_list.add_door(&self.name, room, door);
            }
        }
        Ok(StepProgress::Complete)
    }
}

#[cfg(test)]
mod tests {
    use warren_grid::{Point, SettableGridView};

    use super::*;

    #[test]
    fn records_each_floor_opening_on_the_expansion_perimeter() {
        let mut context = GenerationContext::new(16, 16);
        let room = Rectangle::new(5, 5, 4, 4);
        let mut grid = Grid::new(16, 16);
        for pos in room.positions() {
            grid.set(pos, true);
        }
        grid.set(Point::new(6, 4), true);
        grid.set(Point::new(9, 7), true);
        let mut rooms = ItemList::new();
        rooms.add(room, "fixture");
        context.add(grid, Some(tags::WALL_FLOOR)).unwrap();
        context.add(rooms, Some(tags::ROOMS)).unwrap();

        DoorFinder::new().perform(&mut context).unwrap();

        let doors = context.get_first::<DoorList>(Some(tags::DOORS)).unwrap();
        let room_doors = doors.doors_for(room).unwrap();
        let found: Vec<Point> = room_doors.doors().collect();
        assert_eq!(found, vec![Point::new(6, 4), Point::new(9, 7)]);
        assert_eq!(room_doors.producer(Point::new(6, 4)), Some("DoorFinder"));
    }
}
