//! Extractor: pulls resources out of the deposit it sits on.

use crate::actor::{ActCtx, ActorError, ActorId, Cooldown};
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// Ticks between extractions unless the builder overrides it.
pub const DEFAULT_EXTRACTOR_DELAY: u32 = 5;

/// Extracts one unit from its own tile's deposit every `delay` ticks while
/// running, storing it in its inventory. Exhausting the deposit shuts the
/// extractor down; it does not restart on its own.
///
/// Exposes a [`crate::actor::PowerSink`]: extractors are the load side of
/// the power system and receive whatever an adjacent generator broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extractor {
    pos: Coordinate,
    running: bool,
    cooldown: Cooldown,
}

impl Extractor {
    pub fn new(pos: Coordinate, delay: u32) -> Self {
        Self {
            pos,
            running: true,
            cooldown: Cooldown::new(delay),
        }
    }

    pub fn position(&self) -> Coordinate {
        self.pos
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub(crate) fn act(&mut self, id: ActorId, ctx: &mut ActCtx<'_>) -> Result<(), ActorError> {
        let ready = self.cooldown.tick();
        if !ready || !self.running {
            return Ok(());
        }

        let Some(inventory) = ctx.inventories.get_mut(id) else {
            return Err(ActorError::MissingInventory { pos: self.pos });
        };
        if !inventory.can_accept_item() {
            // Full: leave the cooldown expired and retry next tick.
            return Ok(());
        }

        let Some(tile) = ctx.grid.tile_mut(self.pos) else {
            return Err(ActorError::OffGrid { pos: self.pos });
        };
        match tile.extract_resource() {
            Some(kind) => {
                let added = inventory.add(kind, 1);
                debug_assert!(added, "accept was checked above");
                self.cooldown.reset();
            }
            None => {
                tracing::debug!(pos = %self.pos, "deposit exhausted, extractor stopping");
                self.running = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActCtx, Actor, PowerSink};
    use crate::grid::Grid;
    use crate::item::{Inventory, ItemType};
    use crate::rng::SimRng;
    use slotmap::{SecondaryMap, SlotMap};

    fn world_parts() -> (
        Grid,
        SlotMap<ActorId, Actor>,
        SecondaryMap<ActorId, Inventory>,
        SecondaryMap<ActorId, PowerSink>,
        SimRng,
    ) {
        (
            Grid::new(4, 4),
            SlotMap::with_key(),
            SecondaryMap::new(),
            SecondaryMap::new(),
            SimRng::new(7),
        )
    }

    #[test]
    fn extracts_on_schedule_and_stores() {
        let (mut grid, mut actors, mut inventories, mut power, mut rng) = world_parts();
        let pos = Coordinate::new(1, 1);
        grid.tile_mut(pos).unwrap().add_resources(ItemType::Coal, 10);

        let id = actors.insert(Actor::Extractor(Extractor::new(pos, 5)));
        inventories.insert(id, Inventory::new(100));

        for tick in 1..=5 {
            let mut ctx = ActCtx {
                grid: &mut grid,
                inventories: &mut inventories,
                power: &mut power,
                rng: &mut rng,
            };
            let actor = actors.get_mut(id).unwrap();
            actor.act(id, &mut ctx).unwrap();
            let stored = inventories[id].count(ItemType::Coal);
            if tick < 5 {
                assert_eq!(stored, 0, "no extraction before tick 5");
            } else {
                assert_eq!(stored, 1, "exactly one unit on tick 5");
            }
        }
        assert_eq!(grid.tile(pos).unwrap().resource_amount(), 9);
    }

    #[test]
    fn stops_when_deposit_runs_out() {
        let (mut grid, mut actors, mut inventories, mut power, mut rng) = world_parts();
        let pos = Coordinate::new(0, 0);
        grid.tile_mut(pos).unwrap().add_resources(ItemType::Iron, 1);

        let id = actors.insert(Actor::Extractor(Extractor::new(pos, 0)));
        inventories.insert(id, Inventory::new(100));

        for _ in 0..3 {
            let mut ctx = ActCtx {
                grid: &mut grid,
                inventories: &mut inventories,
                power: &mut power,
                rng: &mut rng,
            };
            let actor = actors.get_mut(id).unwrap();
            actor.act(id, &mut ctx).unwrap();
        }

        assert_eq!(inventories[id].count(ItemType::Iron), 1);
        assert!(!actors[id].is_running(), "auto-shutdown on exhaustion");
        assert_eq!(grid.tile(pos).unwrap().deposit(), None);
    }

    #[test]
    fn full_inventory_skips_extraction() {
        let (mut grid, mut actors, mut inventories, mut power, mut rng) = world_parts();
        let pos = Coordinate::new(0, 0);
        grid.tile_mut(pos).unwrap().add_resources(ItemType::Coal, 5);

        let id = actors.insert(Actor::Extractor(Extractor::new(pos, 0)));
        let mut full = Inventory::new(2);
        assert!(full.add(ItemType::Coal, 1));
        inventories.insert(id, full);

        let mut ctx = ActCtx {
            grid: &mut grid,
            inventories: &mut inventories,
            power: &mut power,
            rng: &mut rng,
        };
        let actor = actors.get_mut(id).unwrap();
        actor.act(id, &mut ctx).unwrap();

        assert_eq!(grid.tile(pos).unwrap().resource_amount(), 5, "deposit untouched");
        assert!(actors[id].is_running());
    }
}
