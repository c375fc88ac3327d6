//! Conveyor chain priority propagation.
//!
//! Within one tick a belt chain must execute from its far end backward to
//! its near end, or an item would hop several segments in a single tick.
//! Each conveyor's priority is `100 + steps`, where `steps` counts the
//! conveyors between it and the first non-conveyor (or grid-edge) output:
//! the chain's end runs at exactly 100 and the scheduler's ascending sort
//! runs the chain tail-first.
//!
//! Propagation is re-run on every conveyor placement, renumbering the
//! placed segment, every upstream segment reachable through input sides,
//! and any downstream chain the placement joined. It is NOT re-run on
//! deletion: removing a mid-chain belt leaves the survivors' priorities
//! stale until the next placement.

use crate::actor::{Actor, ActorId};
use crate::conveyor::CONVEYOR_BASE_PRIORITY;
use crate::coord::Coordinate;
use crate::grid::Grid;
use slotmap::SlotMap;

/// Renumber the chain(s) touching a freshly placed conveyor at `at`.
/// A no-op when the tile does not hold a conveyor.
pub(crate) fn propagate_from(
    grid: &Grid,
    actors: &mut SlotMap<ActorId, Actor>,
    at: Coordinate,
) {
    let Some(placed) = conveyor_at(grid, actors, at) else {
        return;
    };
    recompute_one(grid, actors, placed);

    // Walk the line backwards through input sides; inserting a segment
    // shifts every upstream segment's distance to the end.
    let cap = grid.area();
    let mut cursor = input_of(actors, placed);
    let mut visited = 0;
    while let Some(id) = cursor.and_then(|c| conveyor_at(grid, actors, c)) {
        recompute_one(grid, actors, id);
        cursor = input_of(actors, id);
        visited += 1;
        if visited >= cap {
            break; // belt loop
        }
    }

    // The placed segment may bridge two chains; renumber the joined
    // downstream side as well.
    let mut cursor = output_of(actors, placed);
    let mut visited = 0;
    while let Some(id) = cursor.and_then(|c| conveyor_at(grid, actors, c)) {
        recompute_one(grid, actors, id);
        cursor = output_of(actors, id);
        visited += 1;
        if visited >= cap {
            break;
        }
    }
}

/// Count the steps from `id` to the end of its chain and store the
/// resulting priority on the conveyor.
fn recompute_one(grid: &Grid, actors: &mut SlotMap<ActorId, Actor>, id: ActorId) {
    let cap = grid.area();
    let mut steps: u32 = 0;
    let mut cursor = output_of(actors, id);
    while let Some(next) = cursor.and_then(|c| conveyor_at(grid, actors, c)) {
        steps += 1;
        if steps as usize >= cap {
            break;
        }
        cursor = output_of(actors, next);
    }
    if let Some(Actor::Conveyor(conveyor)) = actors.get_mut(id) {
        conveyor.set_priority(CONVEYOR_BASE_PRIORITY + steps);
    }
}

/// The conveyor occupying the tile at `c`, if any.
fn conveyor_at(
    grid: &Grid,
    actors: &SlotMap<ActorId, Actor>,
    c: Coordinate,
) -> Option<ActorId> {
    let id = grid.actor_at(c)?;
    match actors.get(id) {
        Some(Actor::Conveyor(_)) => Some(id),
        _ => None,
    }
}

fn output_of(actors: &SlotMap<ActorId, Actor>, id: ActorId) -> Option<Coordinate> {
    match actors.get(id) {
        Some(Actor::Conveyor(c)) => Some(c.output_coord()),
        _ => None,
    }
}

fn input_of(actors: &SlotMap<ActorId, Actor>, id: ActorId) -> Option<Coordinate> {
    match actors.get(id) {
        Some(Actor::Conveyor(c)) => Some(c.input_coord()),
        _ => None,
    }
}
