//! The bundled generation steps.

mod append;
mod area_finder;
mod cellular;
mod connect_closest;
mod connect_ordered;
mod dead_ends;
mod dedupe;
mod door_finder;
mod doors;
mod maze;
mod random_fill;
mod rectangle;
mod rects_to_areas;
mod rooms;

pub use append::ListAppender;
pub use area_finder::AreaFinder;
pub use cellular::CellularAutomataAreaGeneration;
pub use connect_closest::ClosestMapAreaConnection;
pub use connect_ordered::OrderedMapAreaConnection;
pub use dead_ends::TunnelDeadEndTrimming;
pub use dedupe::RemoveDuplicatePoints;
pub use door_finder::DoorFinder;
pub use doors::RoomDoorConnection;
pub use maze::MazeGeneration;
pub use random_fill::RandomViewFill;
pub use rectangle::RectangleGenerator;
pub use rects_to_areas::RectanglesToAreas;
pub use rooms::RoomsGeneration;

use warren_grid::Grid;

use crate::context::GenerationContext;

/// The wall-floor grid under `tag`, created at the context's size when the
/// producing step is the first to touch it.
pub(crate) fn wall_floor_or_new<'a>(
    context: &'a mut GenerationContext,
    tag: &str,
) -> &'a mut Grid<bool> {
    let width = context.width();
    let height = context.height();
    context.get_first_or_new(Some(tag), || Grid::new(width, height))
}
