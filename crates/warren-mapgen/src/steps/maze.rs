//! Backtracking corridor crawler filling the space between rooms.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{AdjacencyRule, Area, Direction, Grid, GridView, Point, SettableGridView};

use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::rng::RogueRng;
use crate::step::{GenerationStep, StepProgress};

use super::wall_floor_or_new;

/// Grows one-cell-wide corridors from empty seeds until no seed remains.
///
/// Each crawler walks depth-first over cardinal neighbors, keeping its facing
/// with growing reluctance to turn: every kept step adds
/// `crawler_change_direction_improvement` to the chance of turning at the
/// next one. One stage per finished crawler.
pub struct MazeGeneration<R: Rng = ChaCha8Rng> {
    pub name: String,
    rng: R,
    pub crawler_change_direction_improvement: f64,
    pub wall_floor_tag: String,
    pub tunnels_tag: String,
}

impl<R: Rng> MazeGeneration<R> {
    pub fn new(rng: R) -> Self {
        Self {
            name: "MazeGeneration".to_owned(),
            rng,
            crawler_change_direction_improvement: 10.0,
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            tunnels_tag: tags::TUNNELS.to_owned(),
        }
    }

    /// An odd-coordinate, non-edge wall pocket whose eight neighbors are all
    /// wall. A hundred random draws, then a deterministic row-major scan.
    fn find_empty_seed(&mut self, grid: &Grid<bool>) -> Option<Point> {
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        for _ in 0..100 {
            let candidate =
                Point::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            if is_seed_candidate(grid, candidate) {
                return Some(candidate);
            }
        }
        for y in 0..height {
            for x in 0..width {
                let candidate = Point::new(x, y);
                if is_seed_candidate(grid, candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn run_crawler(&mut self, grid: &mut Grid<bool>, seed: Point) -> Area {
        let mut area = Area::new();
        let mut stack = vec![seed];
        let mut facing = Direction::None;
        let mut change_chance = 0.0;
        let mut fresh_crawler = true;

        while let Some(&current) = stack.last() {
            grid.set(current, true);
            area.add(current);

            let valid_directions: Vec<Direction> = AdjacencyRule::Cardinals
                .directions_of_neighbors()
                .iter()
                .copied()
                .filter(|&dir| is_carvable(grid, current + dir, dir.opposite()))
                .collect();
            if valid_directions.is_empty() {
                stack.pop();
                continue;
            }

            if fresh_crawler || !valid_directions.contains(&facing) {
                facing = valid_directions[self.rng.gen_range(0..valid_directions.len())];
                change_chance = 0.0;
                fresh_crawler = false;
            } else if self.rng.percentage_check(change_chance) {
                facing = valid_directions[self.rng.gen_range(0..valid_directions.len())];
                change_chance = 0.0;
            } else {
                change_chance += self.crawler_change_direction_improvement;
            }

            stack.push(current + facing);
        }
        area
    }
}

fn is_seed_candidate(grid: &Grid<bool>, pos: Point) -> bool {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    if pos.x < 1 || pos.y < 1 || pos.x >= width - 1 || pos.y >= height - 1 {
        return false;
    }
    if pos.x % 2 == 0 || pos.y % 2 == 0 {
        return false;
    }
    AdjacencyRule::EightWay.neighbors(pos).all(|neighbor| {
        grid.contains(neighbor) && !grid.get(neighbor)
    })
}

/// A cell may be carved when it sits in the interior and everything around it
/// is wall, except the cell the crawler is arriving from.
fn is_carvable(grid: &Grid<bool>, pos: Point, source_direction: Direction) -> bool {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    if pos.x < 1 || pos.y < 1 || pos.x >= width - 1 || pos.y >= height - 1 {
        return false;
    }
    for &dir in AdjacencyRule::EightWay.directions_of_neighbors_clockwise() {
        let neighbor = pos + dir;
        if !grid.contains(neighbor) {
            return false;
        }
        if dir == source_direction {
            continue;
        }
        if grid.get(neighbor) {
            return false;
        }
    }
    true
}

impl<R: Rng> GenerationStep for MazeGeneration<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        if !(0.0..=100.0).contains(&self.crawler_change_direction_improvement) {
            return Err(GenerationError::invalid(
                &self.name,
                "crawler_change_direction_improvement",
                format!("must be within [0, 100], got {}", self.crawler_change_direction_improvement),
            ));
        }
        wall_floor_or_new(context, &self.wall_floor_tag);
        context.get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::<Area>::new);
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let tunnel = {
            let grid = wall_floor_or_new(context, &self.wall_floor_tag);
            let Some(seed) = self.find_empty_seed(grid) else {
                return Ok(StepProgress::Complete);
            };
            self.run_crawler(grid, seed)
        };

        if !tunnel.is_empty() {
            let tunnels = context.get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::new);
            tunnels.add(tunnel, &self.name);
        }
        Ok(StepProgress::Paused)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    fn generate_maze(seed: u64) -> (GenerationContext, Vec<Area>) {
        let mut context = GenerationContext::new(31, 21);
        let mut step = MazeGeneration::new(ChaCha8Rng::seed_from_u64(seed));
        step.perform(&mut context).unwrap();
        let tunnels = context
            .get_first::<ItemList<Area>>(Some(tags::TUNNELS))
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default();
        (context, tunnels)
    }

    #[test]
    fn corridors_stay_off_the_outer_perimeter() {
        for seed in [3_u64, 64, 901] {
            let (_, tunnels) = generate_maze(seed);
            assert!(!tunnels.is_empty());
            for tunnel in &tunnels {
                for pos in tunnel.iter() {
                    assert!(
                        pos.x >= 1 && pos.y >= 1 && pos.x <= 29 && pos.y <= 19,
                        "seed {seed}: corridor cell {pos:?} on the perimeter"
                    );
                }
            }
        }
    }

    #[test]
    fn corridors_are_locally_one_cell_wide() {
        let (context, tunnels) = generate_maze(11);
        let grid = context.get_first::<Grid<bool>>(Some(tags::WALL_FLOOR)).unwrap();

        // No 2x2 block of floor anywhere in a pure maze.
        for tunnel in &tunnels {
            for pos in tunnel.iter() {
                let block = [
                    pos,
                    Point::new(pos.x + 1, pos.y),
                    Point::new(pos.x, pos.y + 1),
                    Point::new(pos.x + 1, pos.y + 1),
                ];
                let all_floor =
                    block.iter().all(|&cell| grid.contains(cell) && grid.get(cell));
                assert!(!all_floor, "2x2 open block at {pos:?}");
            }
        }
    }

    #[test]
    fn maze_fills_until_no_seed_remains() {
        let (context, _) = generate_maze(42);
        let grid = context.get_first::<Grid<bool>>(Some(tags::WALL_FLOOR)).unwrap();
        for y in 0..21 {
            for x in 0..31 {
                assert!(
                    !is_seed_candidate(grid, Point::new(x, y)),
                    "seed candidate left at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn out_of_range_improvement_is_a_configuration_error() {
        let mut context = GenerationContext::new(15, 15);
        let mut step = MazeGeneration::new(ChaCha8Rng::seed_from_u64(0));
        step.crawler_change_direction_improvement = -3.0;
        assert!(matches!(
            step.perform(&mut context).unwrap_err(),
            GenerationError::InvalidConfiguration { .. }
        ));
    }
}
