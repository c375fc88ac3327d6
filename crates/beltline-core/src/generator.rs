//! Generator: burns coal and broadcasts power to adjacent sinks.

use crate::actor::{ActCtx, ActorError, ActorId, Cooldown};
use crate::coord::{Coordinate, Direction};
use crate::item::ItemType;
use serde::{Deserialize, Serialize};

/// Ticks between fuel burns.
pub const DEFAULT_GENERATOR_DELAY: u32 = 10;

/// Power broadcast to each adjacent sink per burn.
pub const POWER_OUTPUT: u32 = 500;

/// Aggregate fuel inventory capacity.
pub const FUEL_CAPACITY: u32 = 500;

/// The item type consumed as fuel.
pub const FUEL: ItemType = ItemType::Coal;

/// When fueled with coal, generates power.
///
/// Every `delay` ticks while running, consumes one unit of fuel and writes
/// [`POWER_OUTPUT`] into the power sink of every orthogonally-adjacent
/// actor that has one. When the fuel runs out the generator stops and
/// writes zero to the same neighbors, each tick, until refueled and
/// restarted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pos: Coordinate,
    running: bool,
    cooldown: Cooldown,
}

impl Generator {
    pub fn new(pos: Coordinate) -> Self {
        Self::with_delay(pos, DEFAULT_GENERATOR_DELAY)
    }

    pub fn with_delay(pos: Coordinate, delay: u32) -> Self {
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
        if !self.cooldown.tick() {
            return Ok(());
        }

        if self.running {
            let Some(inventory) = ctx.inventories.get_mut(id) else {
                return Err(ActorError::MissingInventory { pos: self.pos });
            };
            if inventory.remove(FUEL, 1) == 1 {
                broadcast(self.pos, POWER_OUTPUT, ctx);
                self.cooldown.reset();
            } else {
                tracing::debug!(pos = %self.pos, "out of fuel, generator stopping");
                self.running = false;
                broadcast(self.pos, 0, ctx);
            }
        } else {
            broadcast(self.pos, 0, ctx);
        }
        Ok(())
    }
}

/// Write `power` into the sink of every orthogonal neighbor that has one.
fn broadcast(pos: Coordinate, power: u32, ctx: &mut ActCtx<'_>) {
    for direction in Direction::all() {
        let Some(neighbor) = ctx.grid.neighbor(pos, direction) else {
            continue;
        };
        let Some(actor_id) = ctx.grid.actor_at(neighbor) else {
            continue;
        };
        if let Some(sink) = ctx.power.get_mut(actor_id) {
            sink.available = power;
        }
    }
}
