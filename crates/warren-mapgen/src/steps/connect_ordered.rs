//! Connects areas pairwise in (optionally shuffled) list order.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warren_grid::{Area, Grid, MultiArea};

use crate::connection::{ConnectionPointSelector, TunnelCreator};
use crate::context::{tags, GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Chains each area to its predecessor: after an optional shuffle, area `i`
/// connects to area `i - 1` for every `i` from 1 up. One stage per carved
/// connection.
pub struct OrderedMapAreaConnection<R: Rng = ChaCha8Rng> {
    pub name: String,
    pub areas_tag: String,
    pub tunnels_tag: String,
    pub wall_floor_tag: String,
    pub randomize_order: bool,
    rng: R,
    point_selector: Box<dyn ConnectionPointSelector>,
    tunnel_creator: Box<dyn TunnelCreator>,
    state: Option<OrderedState>,
}

struct OrderedState {
    arena: Vec<Area>,
    order: Vec<usize>,
    next: usize,
}

impl<R: Rng> OrderedMapAreaConnection<R> {
    pub fn new(
        rng: R,
        point_selector: Box<dyn ConnectionPointSelector>,
        tunnel_creator: Box<dyn TunnelCreator>,
    ) -> Self {
        Self {
            name: "OrderedMapAreaConnection".to_owned(),
            areas_tag: tags::AREAS.to_owned(),
            tunnels_tag: tags::TUNNELS.to_owned(),
            wall_floor_tag: tags::WALL_FLOOR.to_owned(),
            randomize_order: true,
            rng,
            point_selector,
            tunnel_creator,
            state: None,
        }
    }
}

impl<R: Rng> GenerationStep for OrderedMapAreaConnection<R> {
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
        let arena: Vec<Area> = context
            .get_first::<ItemList<Area>>(Some(&self.areas_tag))
            .expect("checked by requirements")
            .iter()
            .cloned()
            .collect();
        let mut order: Vec<usize> = (0..arena.len()).collect();
        if self.randomize_order {
            order.shuffle(&mut self.rng);
        }
        context.get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::<Area>::new);
        self.state = Some(OrderedState { arena, order, next: 1 });
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let state = self.state.as_mut().expect("begin ran first");
        if state.next >= state.order.len() {
            return Ok(StepProgress::Complete);
        }

        let current = &state.arena[state.order[state.next]];
        let previous = &state.arena[state.order[state.next - 1]];
        let current_view: MultiArea = [current].into_iter().collect();
        let previous_view: MultiArea = [previous].into_iter().collect();
        let (from, to) =
            self.point_selector.select_connection_points(&current_view, &previous_view);
        state.next += 1;

        let tunnel = {
            let grid = context
                .get_first_mut::<Grid<bool>>(Some(&self.wall_floor_tag))
                .expect("checked by requirements");
            self.tunnel_creator.create_tunnel(grid, from, to)
        };
        context
            .get_first_or_new(Some(self.tunnels_tag.as_str()), ItemList::new)
            .add(tunnel, &self.name);

        if state.next >= state.order.len() {
            Ok(StepProgress::Complete)
        } else {
            Ok(StepProgress::Paused)
        }
    }
}
