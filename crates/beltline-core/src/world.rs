//! The world: grid, actor arena, and per-actor state under one owner.
//!
//! Actors live in a slotmap arena; their inventories and power sinks live
//! in secondary maps keyed by the same [`ActorId`]. Tiles reference actors
//! by ID only. This struct-of-arrays split is what lets one actor mutate a
//! neighbor's inventory during its turn without ever aliasing the arena:
//! `act()` receives the grid, the inventory map, the power map, and the
//! RNG -- everything except the arena the acting actor itself lives in.
//!
//! There is no global lookup anywhere; the world is passed by reference
//! into construction, scheduling, and queries.

use crate::actor::{ActCtx, Actor, ActorError, ActorId, PowerSink};
use crate::coord::Coordinate;
use crate::grid::Grid;
use crate::item::Inventory;
use crate::priority;
use crate::rng::SimRng;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

/// A failed placement. Both cases are invariant violations on the caller's
/// side: the operation is logged and the world is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coordinate),

    #[error("tile {0} is already occupied")]
    Occupied(Coordinate),
}

/// The owning simulation context.
#[derive(Debug, Serialize, Deserialize)]
pub struct World {
    pub grid: Grid,
    pub(crate) actors: SlotMap<ActorId, Actor>,
    pub(crate) inventories: SecondaryMap<ActorId, Inventory>,
    pub(crate) power: SecondaryMap<ActorId, PowerSink>,
    pub(crate) rng: SimRng,
}

impl World {
    pub fn new(grid: Grid, rng: SimRng) -> Self {
        Self {
            grid,
            actors: SlotMap::with_key(),
            inventories: SecondaryMap::new(),
            power: SecondaryMap::new(),
            rng,
        }
    }

    /// Number of live actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn actor_at(&self, c: Coordinate) -> Option<&Actor> {
        self.grid.actor_at(c).and_then(|id| self.actors.get(id))
    }

    pub fn inventory(&self, id: ActorId) -> Option<&Inventory> {
        self.inventories.get(id)
    }

    pub fn inventory_mut(&mut self, id: ActorId) -> Option<&mut Inventory> {
        self.inventories.get_mut(id)
    }

    pub fn power_sink(&self, id: ActorId) -> Option<&PowerSink> {
        self.power.get(id)
    }

    /// Place an actor on its tile, registering its inventory and power sink.
    ///
    /// The tile must be vacant; occupancy is checked here immediately before
    /// insertion, and a conflict leaves the original occupant in place. A
    /// placed conveyor triggers chain priority propagation.
    pub fn place(&mut self, actor: Actor) -> Result<ActorId, PlaceError> {
        let pos = actor.position();
        if !self.grid.contains(pos) {
            tracing::warn!(%pos, kind = %actor.kind(), "placement outside the grid");
            return Err(PlaceError::OutOfBounds(pos));
        }
        if !self.grid.tile(pos).is_some_and(|t| t.is_vacant()) {
            tracing::warn!(%pos, kind = %actor.kind(), "tile already occupied, keeping original");
            return Err(PlaceError::Occupied(pos));
        }

        let inventory = actor.starting_inventory();
        let sink = actor.starting_power_sink();
        let is_conveyor = matches!(actor, Actor::Conveyor(_));

        let id = self.actors.insert(actor);
        let occupied = self
            .grid
            .tile_mut(pos)
            .map(|t| t.add_actor(id))
            .unwrap_or(false);
        debug_assert!(occupied, "vacancy was checked above");
        self.inventories.insert(id, inventory);
        if let Some(sink) = sink {
            self.power.insert(id, sink);
        }

        if is_conveyor {
            priority::propagate_from(&self.grid, &mut self.actors, pos);
        }
        Ok(id)
    }

    /// Remove the actor occupying `c`, clearing the tile and dropping all
    /// per-actor state. Returns the removed actor, or `None` (logged) when
    /// the tile is vacant or out of bounds.
    ///
    /// Chain priorities are NOT recomputed here; surviving belt segments
    /// keep their old priorities until the next conveyor placement.
    pub fn remove_at(&mut self, c: Coordinate) -> Option<(ActorId, Actor)> {
        let Some(id) = self.grid.actor_at(c) else {
            tracing::warn!(pos = %c, "no actor to remove");
            return None;
        };
        let removed = self
            .grid
            .tile_mut(c)
            .map(|t| t.remove_actor(id))
            .unwrap_or(false);
        if !removed {
            tracing::warn!(pos = %c, "tile occupant mismatch during removal");
            return None;
        }
        self.inventories.remove(id);
        self.power.remove(id);
        self.actors.remove(id).map(|actor| (id, actor))
    }

    /// Run one actor's `act()` with disjoint borrows of everything else.
    /// A missing actor (removed earlier this run) is silently skipped.
    pub(crate) fn run_actor(&mut self, id: ActorId) -> Result<(), ActorError> {
        let World {
            grid,
            actors,
            inventories,
            power,
            rng,
        } = self;
        let Some(actor) = actors.get_mut(id) else {
            return Ok(());
        };
        let mut ctx = ActCtx {
            grid,
            inventories,
            power,
            rng,
        };
        actor.act(id, &mut ctx)
    }
}
