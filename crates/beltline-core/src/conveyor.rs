//! Conveyor belt segment: push-only, single-item transport.

use crate::actor::{ActCtx, ActorError, ActorId, Cooldown};
use crate::coord::{Coordinate, Direction};
use serde::{Deserialize, Serialize};

/// Base delay between pushes. Higher-tier belts would lower this; the
/// default moves one item per tick.
pub const DEFAULT_CONVEYOR_DELAY: u32 = 0;

/// Floor of the conveyor scheduling band. The segment at the end of a chain
/// runs at exactly this priority; each upstream segment runs one later.
pub const CONVEYOR_BASE_PRIORITY: u32 = 100;

/// A belt segment holding at most one item.
///
/// Conveyors only spit their contents out in the facing direction; they
/// never pull. Items arrive either from an upstream conveyor's push or from
/// a loader. The input side -- used by the priority walk -- is the tile
/// opposite the facing, i.e. the segment is straight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conveyor {
    pos: Coordinate,
    facing: Direction,
    running: bool,
    cooldown: Cooldown,
    priority: u32,
}

impl Conveyor {
    pub fn new(pos: Coordinate, facing: Direction, delay: u32) -> Self {
        Self {
            pos,
            facing,
            running: true,
            cooldown: Cooldown::new(delay),
            priority: CONVEYOR_BASE_PRIORITY,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.pos
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// The tile this segment pushes into.
    pub fn output_coord(&self) -> Coordinate {
        self.pos.step(self.facing)
    }

    /// The tile this segment is fed from.
    pub fn input_coord(&self) -> Coordinate {
        self.pos.step(self.facing.opposite())
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    pub fn glyph(&self) -> char {
        match self.facing {
            Direction::North | Direction::South => '|',
            Direction::East | Direction::West => '-',
        }
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

        // Off the grid edge or an empty tile: nowhere to push.
        let Some(out) = ctx.grid.neighbor(self.pos, self.facing) else {
            return Ok(());
        };
        let Some(out_id) = ctx.grid.actor_at(out) else {
            return Ok(());
        };
        if !ctx
            .inventories
            .get(out_id)
            .is_some_and(|inv| inv.can_accept_item())
        {
            return Ok(());
        }

        let Some([inventory, out_inventory]) = ctx.inventories.get_disjoint_mut([id, out_id])
        else {
            return Err(ActorError::MissingInventory { pos: self.pos });
        };
        let Some(kind) = inventory.random_item_type(ctx.rng) else {
            return Ok(());
        };
        if out_inventory.add(kind, 1) {
            let removed = inventory.remove(kind, 1);
            debug_assert_eq!(removed, 1);
            self.cooldown.reset();
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

    struct Fixture {
        grid: Grid,
        actors: SlotMap<ActorId, Actor>,
        inventories: SecondaryMap<ActorId, Inventory>,
        power: SecondaryMap<ActorId, PowerSink>,
        rng: SimRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                grid: Grid::new(6, 6),
                actors: SlotMap::with_key(),
                inventories: SecondaryMap::new(),
                power: SecondaryMap::new(),
                rng: SimRng::new(3),
            }
        }

        fn place(&mut self, actor: Actor, inventory: Inventory) -> ActorId {
            let pos = actor.position();
            let id = self.actors.insert(actor);
            assert!(self.grid.tile_mut(pos).unwrap().add_actor(id));
            self.inventories.insert(id, inventory);
            id
        }

        fn act(&mut self, id: ActorId) {
            let Fixture {
                grid,
                actors,
                inventories,
                power,
                rng,
            } = self;
            let mut ctx = ActCtx {
                grid,
                inventories,
                power,
                rng,
            };
            actors.get_mut(id).unwrap().act(id, &mut ctx).unwrap();
        }
    }

    #[test]
    fn pushes_into_accepting_neighbor() {
        let mut fx = Fixture::new();
        let belt = fx.place(
            Actor::Conveyor(Conveyor::new(Coordinate::new(1, 1), Direction::East, 0)),
            {
                let mut inv = Inventory::single_item();
                assert!(inv.add(ItemType::Iron, 1));
                inv
            },
        );
        let bin = fx.place(
            Actor::Storage(crate::storage::Storage::new(Coordinate::new(2, 1))),
            Inventory::new(50),
        );

        fx.act(belt);
        assert_eq!(fx.inventories[belt].total(), 0, "belt cleared");
        assert_eq!(fx.inventories[bin].count(ItemType::Iron), 1);
    }

    #[test]
    fn holds_item_when_neighbor_is_full() {
        let mut fx = Fixture::new();
        let belt = fx.place(
            Actor::Conveyor(Conveyor::new(Coordinate::new(1, 1), Direction::East, 0)),
            {
                let mut inv = Inventory::single_item();
                assert!(inv.add(ItemType::Iron, 1));
                inv
            },
        );
        let blocked = fx.place(
            Actor::Conveyor(Conveyor::new(Coordinate::new(2, 1), Direction::East, 0)),
            {
                let mut inv = Inventory::single_item();
                assert!(inv.add(ItemType::Coal, 1));
                inv
            },
        );

        fx.act(belt);
        assert_eq!(fx.inventories[belt].count(ItemType::Iron), 1, "still held");
        assert_eq!(fx.inventories[blocked].total(), 1);
    }

    #[test]
    fn does_nothing_at_grid_edge_or_empty_tile() {
        let mut fx = Fixture::new();
        let edge = fx.place(
            Actor::Conveyor(Conveyor::new(Coordinate::new(5, 5), Direction::East, 0)),
            {
                let mut inv = Inventory::single_item();
                assert!(inv.add(ItemType::Gold, 1));
                inv
            },
        );
        fx.act(edge);
        assert_eq!(fx.inventories[edge].count(ItemType::Gold), 1);
    }

    #[test]
    fn delay_gates_the_push() {
        let mut fx = Fixture::new();
        let belt = fx.place(
            Actor::Conveyor(Conveyor::new(Coordinate::new(1, 1), Direction::East, 2)),
            {
                let mut inv = Inventory::single_item();
                assert!(inv.add(ItemType::Iron, 1));
                inv
            },
        );
        let bin = fx.place(
            Actor::Storage(crate::storage::Storage::new(Coordinate::new(2, 1))),
            Inventory::new(50),
        );

        fx.act(belt);
        assert_eq!(fx.inventories[bin].total(), 0, "tick 1: cooling down");
        fx.act(belt);
        assert_eq!(fx.inventories[bin].total(), 1, "tick 2: fires");
    }

    #[test]
    fn orientation_glyphs() {
        let v = Conveyor::new(Coordinate::new(0, 0), Direction::North, 0);
        let h = Conveyor::new(Coordinate::new(0, 0), Direction::West, 0);
        assert_eq!(v.glyph(), '|');
        assert_eq!(h.glyph(), '-');
    }
}
