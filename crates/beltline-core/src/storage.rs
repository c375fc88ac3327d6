//! Storage box: a passive container.

use crate::actor::{ActCtx, ActorError, ActorId};
use crate::coord::Coordinate;
use serde::{Deserialize, Serialize};

/// Aggregate capacity of a storage box.
pub const STORAGE_CAPACITY: u32 = 50;

/// Stores a small number of items. Boxes never move anything on their own
/// -- loaders push into and pull out of them. `act()` only refreshes the
/// cached item total that observers read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pos: Coordinate,
    running: bool,
    cached_total: u32,
}

impl Storage {
    pub fn new(pos: Coordinate) -> Self {
        Self {
            pos,
            running: true,
            cached_total: 0,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.pos
    }

    /// The item total as of this box's last turn. May trail the live
    /// inventory within a tick; observers read committed post-tick state.
    pub fn cached_total(&self) -> u32 {
        self.cached_total
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
        let Some(inventory) = ctx.inventories.get(id) else {
            return Err(ActorError::MissingInventory { pos: self.pos });
        };
        self.cached_total = inventory.total();
        Ok(())
    }
}
