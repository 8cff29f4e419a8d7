//! Opens doorways between rooms and the corridors around them.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{Direction, Grid, GridView, Point, Rectangle, SettableGridView};

use crate::context::{tags, DoorList, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::rng::RogueRng;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Carves door openings through each room's wall ring.
///
/// Every room must still be sealed when this step runs; an upstream step
/// having carved into a room's wall ring raises the regenerate signal. One
/// stage per room.
pub struct RoomDoorConnection<R: Rng = ChaCha8Rng> {
    pub name: String,
    rng: R,
    pub rooms_tag: String,
    pub wall_floor_tag: String,
    pub doors_tag: String,
    /// How many sides of a room may receive doors, 1 through 4.
    pub max_sides_to_connect: u32,
    /// How many candidate sides survive the random side cancellation.
    pub min_sides_to_connect: u32,
    pub cancel_side_connection_select_chance: f64,
    pub cancel_connection_placement_chance: f64,
    pub cancel_connection_placement_chance_increase: f64,
    room_index: usize,
}

impl<R: Rng> RoomDoorConnection<R> {
    pub fn new(rng: R) -> Self {
        Self {
            name: "RoomDoorConnection".to_owned(),
            rng,
            rooms_tag: tags::ROOMS.to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            doors_tag: tags::DOORS.to_owned(),
            max_sides_to_connect: 4,
            min_sides_to_connect: 1,
            cancel_side_connection_select_chance: 50.0,
            cancel_connection_placement_chance: 70.0,
            cancel_connection_placement_chance_increase: 10.0,
            room_index: 0,
        }
    }

    /// Wall cells of one side of the ring that open onto reachable floor.
    fn side_candidates(
        grid: &Grid<bool>,
        room: Rectangle,
        side: Direction,
    ) -> Vec<Point> {
        let inner = grid.bounds().expand(-1, -1);
        let mut candidates = Vec::new();
        for pos in room.positions_on_side(side) {
            let wall = pos + side;
            let beyond = wall + side;
            if !grid.contains(wall) || grid.get(wall) {
                continue;
            }
            if !inner.contains(beyond) || !grid.get(beyond) {
                continue;
            }
            candidates.push(wall);
        }
        candidates
    }

    fn connect_room(&mut self, grid: &mut Grid<bool>, room: Rectangle) -> Vec<Point> {
        let mut sides: Vec<(Direction, Vec<Point>)> = [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
        .into_iter()
        .filter_map(|side| {
            let candidates = Self::side_candidates(grid, room, side);
            (!candidates.is_empty()).then_some((side, candidates))
        })
        .collect();

        while sides.len() > self.max_sides_to_connect as usize {
            let dropped = self.rng.gen_range(0..sides.len());
            sides.remove(dropped);
        }

        let mut index = 0;
        while index < sides.len() {
            if sides.len() > self.min_sides_to_connect as usize
                && self.rng.percentage_check(self.cancel_side_connection_select_chance)
            {
                sides.remove(index);
            } else {
                index += 1;
            }
        }

        let mut doors = Vec::new();
        for (side, mut candidates) in sides {
            let mut cancel_chance = self.cancel_connection_placement_chance;
            while !candidates.is_empty() {
                let picked = candidates.remove(self.rng.gen_range(0..candidates.len()));

                // A neighboring carve along the ring would merge two doors
                // into one wide opening; skip such candidates.
                let along_ring = [picked + side.rotate(2), picked + side.rotate(-2)];
                if along_ring
                    .iter()
                    .any(|&neighbor| grid.contains(neighbor) && grid.get(neighbor))
                {
                    continue;
                }

                grid.set(picked, true);
                doors.push(picked);

                if self.rng.percentage_check(cancel_chance) {
                    break;
                }
                cancel_chance += self.cancel_connection_placement_chance_increase;
            }
        }
        doors
    }
}

impl<R: Rng> GenerationStep for RoomDoorConnection<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<Rectangle>>(Some(&self.rooms_tag)),
            ComponentRequirement::of::<Grid<bool>>(Some(&self.wall_floor_tag)),
        ]
    }

    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        if !(1..=4).contains(&self.max_sides_to_connect) {
            return Err(GenerationError::invalid(
                &self.name,
                "max_sides_to_connect",
                format!("must be within [1, 4], got {}", self.max_sides_to_connect),
            ));
        }
        if self.min_sides_to_connect > self.max_sides_to_connect {
            return Err(GenerationError::invalid(
                &self.name,
                "min_sides_to_connect",
                format!(
                    "min_sides_to_connect ({}) must not exceed max_sides_to_connect ({})",
                    self.min_sides_to_connect, self.max_sides_to_connect
                ),
            ));
        }
        for (parameter, value) in [
            ("cancel_side_connection_select_chance", self.cancel_side_connection_select_chance),
            ("cancel_connection_placement_chance", self.cancel_connection_placement_chance),
            (
                "cancel_connection_placement_chance_increase",
                self.cancel_connection_placement_chance_increase,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(GenerationError::invalid(
                    &self.name,
                    parameter,
                    format!("must be within [0, 100], got {value}"),
                ));
            }
        }

        // Rooms must still be sealed; an opened wall ring means an upstream
        // step carved into a room and the map cannot be repaired locally.
        let rooms: Vec<Rectangle> = context
            .get_first::<ItemList<Rectangle>>(Some(&self.rooms_tag))
            .expect("checked by requirements")
            .iter()
            .copied()
            .collect();
        let grid = context
            .get_first::<Grid<bool>>(Some(&self.wall_floor_tag))
            .expect("checked by requirements");
        for room in &rooms {
            for pos in room.expand(1, 1).perimeter_positions() {
                if grid.contains(pos) && grid.get(pos) {
                    return Err(GenerationError::regenerate(format!(
                        "room at {:?} already has an opening in its wall ring at {pos:?}",
                        room.min_extent()
                    )));
                }
            }
        }

        self.room_index = 0;
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let rooms: Vec<Rectangle> = context
            .get_first::<ItemList<Rectangle>>(Some(&self.rooms_tag))
            .expect("checked by requirements")
            .iter()
            .copied()
            .collect();
        if self.room_index >= rooms.len() {
            return Ok(StepProgress::Complete);
        }

        let room = rooms[self.room_index];
        self.room_index += 1;

        let doors = {
            let grid = context
                .get_first_mut::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            self.connect_room(grid, room)
        };
        let door_list = context.get_first_or_new(Some(self.doors_tag.as_str()), DoorList::new);
        for door in doors {
            door_list.add_door(&self.name, room, door);
        }

        if self.room_index >= rooms.len() {
            Ok(StepProgress::Complete)
        } else {
            Ok(StepProgress::Paused)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use warren_grid::AdjacencyRule;

    use super::*;

    /// A sealed room with corridor floor one cell past its wall ring on every
    /// side.
    fn context_with_sealed_room(room: Rectangle) -> GenerationContext {
        let mut context = GenerationContext::new(20, 20);
        let mut grid = Grid::new(20, 20);
        for pos in room.positions() {
            grid.set(pos, true);
        }
        for pos in room.expand(2, 2).perimeter_positions() {
            let inner = grid.bounds().expand(-1, -1);
            if inner.contains(pos) {
                grid.set(pos, true);
            }
        }
        let mut rooms = ItemList::new();
        rooms.add(room, "fixture");
        context.add(grid, Some(tags::WALL_FLOOR)).unwrap();
        context.add(rooms, Some(tags::ROOMS)).unwrap();
        context
    }

    #[test]
    fn doors_sit_on_the_ring_and_open_onto_floor() {
        let room = Rectangle::new(8, 8, 5, 5);
        for seed in [1_u64, 23, 456] {
            let mut context = context_with_sealed_room(room);
            let mut step = RoomDoorConnection::new(ChaCha8Rng::seed_from_u64(seed));
            step.perform(&mut context).unwrap();

            let grid = context.get_first::<Grid<bool>>(Some(tags::WALL_FLOOR)).unwrap();
            let doors = context.get_first::<DoorList>(Some(tags::DOORS)).unwrap();
            let room_doors = doors.doors_for(room).expect("at least one side connects");
            assert!(!room_doors.is_empty());

            let ring = room.expand(1, 1);
            for door in room_doors.doors() {
                assert!(grid.get(door), "door {door:?} must be floor");
                let on_ring = ring.perimeter_positions().contains(&door);
                assert!(on_ring, "door {door:?} must be on the wall ring");
                let floor_neighbors = AdjacencyRule::Cardinals
                    .neighbors(door)
                    .filter(|&pos| grid.contains(pos) && grid.get(pos))
                    .count();
                assert!(floor_neighbors >= 2, "door {door:?} must join room and corridor");
            }
        }
    }

    #[test]
    fn doors_never_merge_into_wide_openings() {
        let room = Rectangle::new(8, 8, 5, 5);
        for seed in 0_u64..20 {
            let mut context = context_with_sealed_room(room);
            let mut step = RoomDoorConnection::new(ChaCha8Rng::seed_from_u64(seed));
            step.cancel_connection_placement_chance = 0.0;
            step.cancel_connection_placement_chance_increase = 0.0;
            step.perform(&mut context).unwrap();

            let doors = context.get_first::<DoorList>(Some(tags::DOORS)).unwrap();
            let placed: Vec<Point> = doors.doors_for(room).unwrap().doors().collect();
            for (index, &left) in placed.iter().enumerate() {
                for &right in &placed[index + 1..] {
                    let adjacent = (left.x - right.x).abs() + (left.y - right.y).abs() == 1;
                    assert!(!adjacent, "seed {seed}: doors {left:?} and {right:?} touch");
                }
            }
        }
    }

    #[test]
    fn a_breached_room_wall_raises_the_regenerate_signal() {
        let room = Rectangle::new(8, 8, 5, 5);
        let mut context = context_with_sealed_room(room);
        context
            .get_first_mut::<Grid<bool>>(Some(tags::WALL_FLOOR))
            .unwrap()
            .set(Point::new(10, 7), true);

        let mut step = RoomDoorConnection::new(ChaCha8Rng::seed_from_u64(2));
        let error = step.perform(&mut context).unwrap_err();
        assert!(matches!(error, GenerationError::RegenerateMap { .. }));
    }

    #[test]
    fn side_bounds_are_validated() {
        let mut context = context_with_sealed_room(Rectangle::new(8, 8, 5, 5));
        let mut step = RoomDoorConnection::new(ChaCha8Rng::seed_from_u64(2));
        step.max_sides_to_connect = 5;
        assert!(matches!(
            step.perform(&mut context).unwrap_err(),
            GenerationError::InvalidConfiguration { parameter: "max_sides_to_connect", .. }
        ));
    }
}
