//! Non-overlapping rectangular room placement.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{GridView, Rectangle, SettableGridView};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{GenerationStep, StepProgress};

use super::wall_floor_or_new;

/// Carves randomly sized rooms with odd dimensions and odd positions, keeping
/// a three-cell margin between a room and any previously carved floor.
///
/// One stage per room slot; a slot whose placement attempts all fail is
/// skipped, so the final room count may fall below the drawn target.
pub struct RoomsGeneration<R: Rng = ChaCha8Rng> {
    pub name: String,
    rng: R,
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub room_min_size: u32,
    pub room_max_size: u32,
    pub room_size_ratio_x: f64,
    pub room_size_ratio_y: f64,
    pub max_creation_attempts: u32,
    pub max_placement_attempts: u32,
    pub wall_floor_tag: String,
    pub rooms_tag: String,
    remaining_rooms: u32,
}

impl<R: Rng> RoomsGeneration<R> {
    pub fn new(rng: R) -> Self {
        Self {
            name: "RoomsGeneration".to_owned(),
            rng,
            min_rooms: 4,
            max_rooms: 10,
            room_min_size: 3,
            room_max_size: 7,
            room_size_ratio_x: 1.0,
            room_size_ratio_y: 1.0,
            max_creation_attempts: 10,
            max_placement_attempts: 10,
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            rooms_tag: tags::ROOMS.to_owned(),
            remaining_rooms: 0,
        }
    }

    fn draw_room_shape(&mut self) -> (i32, i32) {
        let room_size = self.rng.gen_range(self.room_min_size..=self.room_max_size) as i32;
        let mut width = (room_size as f64 * self.room_size_ratio_x).round() as i32;
        let mut height = (room_size as f64 * self.room_size_ratio_y).round() as i32;

        // Jitter one dimension so square ratios still vary.
        let adjustment_base = room_size / 4;
        if adjustment_base > 0 {
            let adjustment = self.rng.gen_range(-adjustment_base..=adjustment_base);
            if self.rng.gen_bool(0.5) {
                width += (adjustment as f64 * self.room_size_ratio_x).round() as i32;
            } else {
                height += (adjustment as f64 * self.room_size_ratio_y).round() as i32;
            }
        }

        let mut width = width.max(self.room_min_size as i32);
        let mut height = height.max(self.room_min_size as i32);
        if width % 2 == 0 {
            width += 1;
        }
        if height % 2 == 0 {
            height += 1;
        }
        (width, height)
    }

    /// An odd coordinate in `[3, max_exclusive)`, or `None` when the range
    /// holds no odd value.
    fn random_odd_position(&mut self, max_exclusive: i32) -> Option<i32> {
        let largest = if max_exclusive % 2 == 0 { max_exclusive - 1 } else { max_exclusive - 2 };
        if largest < 3 {
            return None;
        }
        let choices = (largest - 3) / 2 + 1;
        Some(3 + 2 * self.rng.gen_range(0..choices))
    }

    fn try_place_room(&mut self, context: &mut GenerationContext) -> Option<Rectangle> {
        let map_width = context.width() as i32;
        let map_height = context.height() as i32;

        for _ in 0..self.max_creation_attempts {
            let (width, height) = self.draw_room_shape();
            for _ in 0..self.max_placement_attempts {
                let Some(x) = self.random_odd_position(map_width - width - 3) else {
                    break;
                };
                let Some(y) = self.random_odd_position(map_height - height - 3) else {
                    break;
                };
                let room = Rectangle::new(x, y, width, height);

                let grid = wall_floor_or_new(context, &self.wall_floor_tag);
                let clearance = room.expand(3, 3);
                if clearance.positions().any(|pos| grid.get(pos)) {
                    continue;
                }
                for pos in room.positions() {
                    grid.set(pos, true);
                }
                return Some(room);
            }
        }
        None
    }
}

impl<R: Rng> GenerationStep for RoomsGeneration<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        if self.min_rooms > self.max_rooms {
            return Err(GenerationError::invalid(
                &self.name,
                "min_rooms",
                format!("min_rooms ({}) must not exceed max_rooms ({})", self.min_rooms, self.max_rooms),
            ));
        }
        if self.min_rooms == 0 {
            return Err(GenerationError::invalid(&self.name, "min_rooms", "must be at least 1"));
        }
        if self.room_min_size > self.room_max_size {
            return Err(GenerationError::invalid(
                &self.name,
                "room_min_size",
                format!(
                    "room_min_size ({}) must not exceed room_max_size ({})",
                    self.room_min_size, self.room_max_size
                ),
            ));
        }
        if self.room_size_ratio_x <= 0.0 {
            return Err(GenerationError::invalid(
                &self.name,
                "room_size_ratio_x",
                format!("must be positive, got {}", self.room_size_ratio_x),
            ));
        }
        if self.room_size_ratio_y <= 0.0 {
            return Err(GenerationError::invalid(
                &self.name,
                "room_size_ratio_y",
                format!("must be positive, got {}", self.room_size_ratio_y),
            ));
        }

        self.remaining_rooms = self.rng.gen_range(self.min_rooms..=self.max_rooms);
        context.get_first_or_new(Some(self.rooms_tag.as_str()), ItemList::<Rectangle>::new);
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        if self.remaining_rooms == 0 {
            return Ok(StepProgress::Complete);
        }
        self.remaining_rooms -= 1;

        if let Some(room) = self.try_place_room(context) {
            let rooms = context.get_first_or_new(Some(self.rooms_tag.as_str()), ItemList::new);
            rooms.add(room, &self.name);
        }

        if self.remaining_rooms == 0 {
            Ok(StepProgress::Complete)
        } else {
            Ok(StepProgress::Paused)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use warren_grid::Grid;

    use super::*;

    fn generate_rooms(seed: u64, configure: impl FnOnce(&mut RoomsGeneration)) -> Vec<Rectangle> {
        let mut context = GenerationContext::new(40, 30);
        let mut step = RoomsGeneration::new(ChaCha8Rng::seed_from_u64(seed));
        configure(&mut step);
        step.perform(&mut context).unwrap();
        context
            .get_first::<ItemList<Rectangle>>(Some(tags::ROOMS))
            .map(|rooms| rooms.iter().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn single_fixed_size_room_lands_on_odd_interior_coordinates() {
        let rooms = generate_rooms(21, |step| {
            step.min_rooms = 1;
            step.max_rooms = 1;
            step.room_min_size = 3;
            step.room_max_size = 3;
        });

        assert_eq!(rooms.len(), 1);
        let room = rooms[0];
        assert_eq!((room.width, room.height), (3, 3));
        assert_eq!(room.x % 2, 1);
        assert_eq!(room.y % 2, 1);
        assert!(room.x >= 3 && room.x <= 40 - 3 - 3);
        assert!(room.y >= 3 && room.y <= 30 - 3 - 3);
    }

    #[test]
    fn rooms_keep_a_three_cell_margin_from_each_other() {
        for seed in [1_u64, 9, 77, 2_048] {
            let rooms = generate_rooms(seed, |_| {});
            assert!(!rooms.is_empty(), "seed {seed} placed no rooms");
            for (index, left) in rooms.iter().enumerate() {
                assert_eq!(left.width % 2, 1);
                assert_eq!(left.height % 2, 1);
                assert!(left.width >= 3 && left.height >= 3);
                for right in &rooms[index + 1..] {
                    assert!(
                        !left.expand(3, 3).intersects(*right),
                        "seed {seed}: rooms {left:?} and {right:?} too close"
                    );
                }
            }
        }
    }

    #[test]
    fn carved_floor_matches_the_recorded_rooms() {
        let mut context = GenerationContext::new(40, 30);
        let mut step = RoomsGeneration::new(ChaCha8Rng::seed_from_u64(5));
        step.perform(&mut context).unwrap();

        let rooms: Vec<Rectangle> = context
            .get_first::<ItemList<Rectangle>>(Some(tags::ROOMS))
            .unwrap()
            .iter()
            .copied()
            .collect();
        let grid = context.get_first::<Grid<bool>>(Some(tags::WALL_FLOOR)).unwrap();
        for pos in grid.positions() {
            let in_room = rooms.iter().any(|room| room.contains(pos));
            assert_eq!(grid.get(pos), in_room, "cell {pos:?}");
        }
    }

    #[test]
    fn inverted_bounds_are_configuration_errors() {
        let mut context = GenerationContext::new(40, 30);
        let mut step = RoomsGeneration::new(ChaCha8Rng::seed_from_u64(1));
        step.min_rooms = 6;
        step.max_rooms = 2;
        let error = step.perform(&mut context).unwrap_err();
        assert!(matches!(
            error,
            GenerationError::InvalidConfiguration { parameter: "min_rooms", .. }
        ));
    }
}
