//! Connects disjoint areas into one region, nearest set first.

use warren_grid::{Area, DisjointSet, Distance, Grid, MultiArea, Point};

use crate::connection::{ConnectionPointSelector, TunnelCreator};
use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Union-find driven connector: while more than one set remains, each root
/// area connects to its nearest other-set peer, and the join event folds the
/// smaller set's sub-areas into the larger set's composite.
///
/// One stage per carved connection.
pub struct ClosestMapAreaConnection {
    pub name: String,
    pub areas_tag: String,
    pub tunnels_tag: String,
    pub wall_floor_tag: String,
    pub distance: Distance,
    point_selector: Box<dyn ConnectionPointSelector>,
    tunnel_creator: Box<dyn TunnelCreator>,
    state: Option<ConnectState>,
}

struct ConnectState {
    arena: Vec<Area>,
    groups: Vec<Vec<usize>>,
    sets: DisjointSet,
    cursor: usize,
}

impl ClosestMapAreaConnection {
    pub fn new(
        distance: Distance,
        point_selector: Box<dyn ConnectionPointSelector>,
        tunnel_creator: Box<dyn TunnelCreator>,
    ) -> Self {
        Self {
            name: "ClosestMapAreaConnection".to_owned(),
            areas_tag: tags::AREAS.to_owned(),
            tunnels_tag: tags::TUNNELS.to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            distance,
            point_selector,
            tunnel_creator,
            state: None,
        }
    }
}

fn group_view<'a>(arena: &'a [Area], group: &[usize]) -> MultiArea<'a> {
    group.iter().map(|&index| &arena[index]).collect()
}

impl GenerationStep for ClosestMapAreaConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<Area>>(Some(&self.areas_tag)),
            ComponentRequirement::of::<Grid<bool>>(Some(&self.wall_floor_tag)),
        ]
    }

    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        let areas: Vec<Area> = context
            .get_first::<ItemList<Area>>(Some(&self.areas_tag))
            .expect("checked by requirements")
            .iter()
            .cloned()
            .collect();
        let count = areas.len();
        context.get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::<Area>::new);
        self.state = Some(ConnectState {
            arena: areas,
            groups: (0..count).map(|index| vec![index]).collect(),
            sets: DisjointSet::new(count),
            cursor: 0,
        });
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let state = self.state.as_mut().expect("begin ran first");
        if state.sets.count() <= 1 {
            return Ok(StepProgress::Complete);
        }

        let (from, to, winner) = {
            let ConnectState { arena, groups, sets, cursor } = &mut *state;
            let count = arena.len();

            // Next set root at or after the cursor, wrapping around.
            let mut root = *cursor % count;
            while sets.find(root) != root {
                root = (root + 1) % count;
            }
            *cursor = root + 1;

            // Nearest peer in any other set, measured between the two sets'
            // composites; the first minimum wins.
            let mut best: Option<(f64, usize, Point, Point)> = None;
            for peer in 0..count {
                if sets.in_same_set(root, peer) {
                    continue;
                }
                let peer_root = sets.find(peer);
                let (from, to) = self.point_selector.select_connection_points(
                    &group_view(arena, &groups[root]),
                    &group_view(arena, &groups[peer_root]),
                );
                let separation = self.distance.between(from, to);
                if best.map_or(true, |(best_separation, ..)| separation < best_separation) {
                    best = Some((separation, peer, from, to));
                }
            }
            let (_, winner, from, to) = best.expect("more than one set remains");
            (from, to, (root, winner))
        };

        let tunnel = {
            let grid = context
                .get_first_mut::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            self.tunnel_creator.create_tunnel(grid, from, to)
        };
        context
            .get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::new)
            .add(tunnel, &self.name);

        if let Some(joined) = state.sets.make_union(winner.0, winner.1) {
            let moved = std::mem::take(&mut state.groups[joined.smaller]);
            state.groups[joined.larger].extend(moved);
        }

        if state.sets.count() <= 1 {
            Ok(StepProgress::Complete)
        } else {
            Ok(StepProgress::Paused)
        }
    }
}
