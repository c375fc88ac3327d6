//! Loader: moves items between adjacent buildings through a one-item buffer.

use crate::actor::{ActCtx, ActorError, ActorId};
use crate::coord::{Coordinate, Direction};
use serde::{Deserialize, Serialize};

/// Pulls from the building on its input side and pushes to the building on
/// the opposite side, one unit at a time.
///
/// Each tick runs two ordered phases: pull into the buffer if it is empty,
/// then push the buffered unit onward if the output accepts it. Because the
/// pull is evaluated first, a unit can pass straight through in a single
/// tick, which keeps a saturated line moving one unit per tick no matter
/// how much is queued on either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loader {
    pos: Coordinate,
    input: Direction,
    running: bool,
}

impl Loader {
    pub fn new(pos: Coordinate, input: Direction) -> Self {
        Self {
            pos,
            input,
            running: true,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.pos
    }

    pub fn input(&self) -> Direction {
        self.input
    }

    /// Output is always the side opposite the input.
    pub fn output(&self) -> Direction {
        self.input.opposite()
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
        if !self.running {
            return Ok(());
        }

        // Phase (a): pull one unit from the input neighbor into an empty
        // buffer.
        if ctx.inventories.get(id).is_none() {
            return Err(ActorError::MissingInventory { pos: self.pos });
        }
        let buffer_empty = ctx.inventories[id].is_empty();
        if buffer_empty {
            if let Some(in_id) = ctx
                .grid
                .neighbor(self.pos, self.input)
                .and_then(|c| ctx.grid.actor_at(c))
            {
                let pick = match ctx.inventories.get(in_id) {
                    Some(inv) => inv.random_item_type(ctx.rng),
                    None => None,
                };
                if let Some(kind) = pick {
                    if let Some([buffer, source]) =
                        ctx.inventories.get_disjoint_mut([id, in_id])
                    {
                        if source.remove(kind, 1) == 1 {
                            let added = buffer.add(kind, 1);
                            debug_assert!(added, "buffer was empty");
                        }
                    }
                }
            }
        }

        // Phase (b): push the buffered unit to the output neighbor.
        if let Some(out_id) = ctx
            .grid
            .neighbor(self.pos, self.output())
            .and_then(|c| ctx.grid.actor_at(c))
        {
            let kind = match ctx.inventories.get(id) {
                Some(buffer) => buffer.random_item_type(ctx.rng),
                None => None,
            };
            if let Some(kind) = kind {
                if let Some([buffer, sink]) = ctx.inventories.get_disjoint_mut([id, out_id]) {
                    if sink.add(kind, 1) {
                        let removed = buffer.remove(kind, 1);
                        debug_assert_eq!(removed, 1);
                    }
                }
            }
        }
        Ok(())
    }
}
