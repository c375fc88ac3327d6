//! Read-only query API for inspecting simulation state.
//!
//! Snapshot types are owned copies with no references into world storage,
//! suitable for handing to rendering and UI code that must never mutate
//! core state.

use crate::actor::BuildingKind;
use crate::coord::Coordinate;
use crate::item::ItemType;

/// An aggregated, read-only view of one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileQuery {
    pub position: Coordinate,
    /// The ground deposit, `None` when empty.
    pub deposit: Option<ItemType>,
    pub resource_amount: u32,
    /// Summary of the occupying building, if any.
    pub actor: Option<ActorSummary>,
}

/// A read-only summary of one building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorSummary {
    pub kind: BuildingKind,
    pub glyph: char,
    pub running: bool,
    pub priority: u32,
    /// Total units currently held in the building's inventory.
    pub items_held: u32,
    /// Power available at the building's sink, for kinds that have one.
    pub power_available: Option<u32>,
}
