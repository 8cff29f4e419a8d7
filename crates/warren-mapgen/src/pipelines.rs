//! Prebuilt step recipes for common map styles.
//!
//! Every randomized step receives its own ChaCha stream derived from the
//! caller's seed, so one `u64` reproduces a whole pipeline.

use warren_grid::{Area, Distance};

use crate::connection::{
    ClosestConnectionPointSelector, DirectLineTunnelCreator, HorizontalVerticalTunnelCreator,
    RandomConnectionPointSelector,
};
use crate::context::tags;
use crate::rng::derive_stream;
use crate::step::GenerationStep;
use crate::steps::{
    CellularAutomataAreaGeneration, ClosestMapAreaConnection, DoorFinder, ListAppender,
    MazeGeneration, OrderedMapAreaConnection, RandomViewFill, RectangleGenerator,
    RectanglesToAreas, RemoveDuplicatePoints, RoomDoorConnection, RoomsGeneration,
    TunnelDeadEndTrimming,
};

/// A single walled rectangle filling the map.
pub fn rectangle_map_steps() -> Vec<Box<dyn GenerationStep>> {
    vec![Box::new(RectangleGenerator::new())]
}

/// Random rooms chained together in shuffled order, with doors recorded
/// afterwards.
pub fn basic_random_rooms_map_steps(seed: u64) -> Vec<Box<dyn GenerationStep>> {
    vec![
        Box::new(RoomsGeneration::new(derive_stream(seed, 0))),
        Box::new(RectanglesToAreas::new()),
        Box::new(OrderedMapAreaConnection::new(
            derive_stream(seed, 1),
            Box::new(RandomConnectionPointSelector::new(derive_stream(seed, 2))),
            Box::new(HorizontalVerticalTunnelCreator::new(derive_stream(seed, 3))),
        )),
        Box::new(DoorFinder::new()),
    ]
}

/// Noise smoothed into caves, with every cave connected to its nearest
/// neighbor.
pub fn cellular_automata_cave_steps(seed: u64) -> Vec<Box<dyn GenerationStep>> {
    let mut fill = RandomViewFill::new(derive_stream(seed, 0));
    fill.fill_probability = 40.0;
    vec![
        Box::new(fill),
        Box::new(CellularAutomataAreaGeneration::new()),
        Box::new(ClosestMapAreaConnection::new(
            Distance::Manhattan,
            Box::new(ClosestConnectionPointSelector { distance: Distance::Manhattan }),
            Box::new(DirectLineTunnelCreator {
                distance: Distance::Manhattan,
                double_wide_vertical: false,
            }),
        )),
    ]
}

/// Rooms surrounded by mazes: crawl corridors everywhere, join the maze
/// pieces, cut doors into the rooms, then trim the leftover dead ends.
pub fn dungeon_maze_map_steps(seed: u64) -> Vec<Box<dyn GenerationStep>> {
    let mut connector = ClosestMapAreaConnection::new(
        Distance::Manhattan,
        Box::new(ClosestConnectionPointSelector { distance: Distance::Manhattan }),
        Box::new(HorizontalVerticalTunnelCreator::new(derive_stream(seed, 2))),
    );
    connector.areas_tag = tags::TUNNELS.to_owned();
    connector.tunnels_tag = tags::MAZE_CONNECTIONS.to_owned();

    vec![
        Box::new(RoomsGeneration::new(derive_stream(seed, 0))),
        Box::new(MazeGeneration::new(derive_stream(seed, 1))),
        Box::new(connector),
        Box::new(RemoveDuplicatePoints::new(tags::TUNNELS, tags::MAZE_CONNECTIONS)),
        Box::new(ListAppender::<Area>::new(tags::TUNNELS, tags::MAZE_CONNECTIONS)),
        Box::new(RoomDoorConnection::new(derive_stream(seed, 3))),
        Box::new(TunnelDeadEndTrimming::new(derive_stream(seed, 4))),
    ]
}
