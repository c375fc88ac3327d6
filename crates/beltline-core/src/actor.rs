//! The actor family: every buildable participates in the scheduler through
//! the single surface `{act, glyph, priority}`.
//!
//! Dispatch is by enum, not trait object: sized inline storage, predictable
//! branching, and every variant's state serializes with the world. The
//! scheduler only ever sees [`Actor`]; concrete kinds stay behind the match.
//!
//! # Shared-access rule
//!
//! During `act()`, an actor may mutate its own state, its own inventory, and
//! the inventory/power sink of a directly grid-adjacent actor -- nothing
//! else. All cross-actor access goes through [`ActCtx`], whose secondary
//! maps are borrowed disjointly from the world for the duration of one
//! invocation.

use crate::conveyor::Conveyor;
use crate::coord::Coordinate;
use crate::extractor::Extractor;
use crate::generator::Generator;
use crate::grid::Grid;
use crate::item::Inventory;
use crate::loader::Loader;
use crate::rng::SimRng;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, new_key_type};

new_key_type! {
    /// Identifies an actor in the world's arena.
    pub struct ActorId;
}

/// The buildable kinds, mirroring the [`Actor`] variants one-to-one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Extractor,
    Loader,
    Conveyor,
    Storage,
    Generator,
}

impl BuildingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Extractor => "extractor",
            BuildingKind::Loader => "loader",
            BuildingKind::Conveyor => "conveyor",
            BuildingKind::Storage => "storage",
            BuildingKind::Generator => "generator",
        }
    }
}

impl std::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Cooldown
// ---------------------------------------------------------------------------

/// A countdown that gates periodic actions.
///
/// `tick()` advances the counter on every call -- including while the owner
/// is stopped, so a restarted actor fires immediately -- and reports
/// readiness. The counter is reset to the configured delay only when the
/// gated action actually fires. A delay of 0 is ready on every tick; a
/// delay of N fires on ticks N, 2N, 3N, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    delay: u32,
    remaining: u32,
}

impl Cooldown {
    pub fn new(delay: u32) -> Self {
        Self {
            delay,
            remaining: delay,
        }
    }

    /// Advance one tick. Returns `true` when the counter has run out.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.remaining == 0
    }

    /// Restart the countdown after the gated action fired.
    pub fn reset(&mut self) {
        self.remaining = self.delay;
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }
}

// ---------------------------------------------------------------------------
// Power sink
// ---------------------------------------------------------------------------

/// A mutable cell receiving the generator broadcast. An actor that exposes
/// one is powered by whatever an orthogonally-adjacent generator last wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSink {
    pub available: u32,
}

// ---------------------------------------------------------------------------
// Act context
// ---------------------------------------------------------------------------

/// Everything an actor may touch during `act()`, borrowed disjointly from
/// the world: the grid, every actor's inventory and power sink, and the
/// simulation RNG. The actor arena itself is deliberately absent -- an
/// acting actor never reaches into a sibling's behavioral state.
pub(crate) struct ActCtx<'a> {
    pub grid: &'a mut Grid,
    pub inventories: &'a mut SecondaryMap<ActorId, Inventory>,
    pub power: &'a mut SecondaryMap<ActorId, PowerSink>,
    pub rng: &'a mut SimRng,
}

/// A failure inside one actor's `act()`. The scheduler logs and skips the
/// actor; the tick continues for everyone else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error("actor at {pos} has no registered inventory")]
    MissingInventory { pos: Coordinate },

    #[error("actor at {pos} sits outside the grid")]
    OffGrid { pos: Coordinate },
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// A building occupying a tile and participating in the tick loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Actor {
    Extractor(Extractor),
    Loader(Loader),
    Conveyor(Conveyor),
    Storage(Storage),
    Generator(Generator),
}

impl Actor {
    pub fn kind(&self) -> BuildingKind {
        match self {
            Actor::Extractor(_) => BuildingKind::Extractor,
            Actor::Loader(_) => BuildingKind::Loader,
            Actor::Conveyor(_) => BuildingKind::Conveyor,
            Actor::Storage(_) => BuildingKind::Storage,
            Actor::Generator(_) => BuildingKind::Generator,
        }
    }

    pub fn position(&self) -> Coordinate {
        match self {
            Actor::Extractor(a) => a.position(),
            Actor::Loader(a) => a.position(),
            Actor::Conveyor(a) => a.position(),
            Actor::Storage(a) => a.position(),
            Actor::Generator(a) => a.position(),
        }
    }

    /// Scheduling band: extraction before loading, loading before power,
    /// everything before belt transport. Conveyor priorities are assigned
    /// by chain propagation and start at 100.
    pub fn priority(&self) -> u32 {
        match self {
            Actor::Extractor(_) => 1,
            Actor::Loader(_) => 2,
            Actor::Generator(_) => 3,
            Actor::Storage(_) => 4,
            Actor::Conveyor(c) => c.priority(),
        }
    }

    /// Single-character representation for observers.
    pub fn glyph(&self) -> char {
        match self {
            Actor::Extractor(_) => 'e',
            Actor::Loader(_) => 'L',
            Actor::Conveyor(c) => c.glyph(),
            Actor::Storage(_) => 'b',
            Actor::Generator(_) => 'g',
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            Actor::Extractor(a) => a.is_running(),
            Actor::Loader(a) => a.is_running(),
            Actor::Conveyor(a) => a.is_running(),
            Actor::Storage(a) => a.is_running(),
            Actor::Generator(a) => a.is_running(),
        }
    }

    pub fn start(&mut self) {
        match self {
            Actor::Extractor(a) => a.start(),
            Actor::Loader(a) => a.start(),
            Actor::Conveyor(a) => a.start(),
            Actor::Storage(a) => a.start(),
            Actor::Generator(a) => a.start(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            Actor::Extractor(a) => a.stop(),
            Actor::Loader(a) => a.stop(),
            Actor::Conveyor(a) => a.stop(),
            Actor::Storage(a) => a.stop(),
            Actor::Generator(a) => a.stop(),
        }
    }

    /// The inventory a freshly built actor of this kind carries.
    pub(crate) fn starting_inventory(&self) -> Inventory {
        match self {
            Actor::Extractor(_) => Inventory::new(crate::item::DEFAULT_CAPACITY),
            Actor::Loader(_) => Inventory::single_item(),
            Actor::Conveyor(_) => Inventory::single_item(),
            Actor::Storage(_) => Inventory::new(crate::storage::STORAGE_CAPACITY),
            Actor::Generator(_) => Inventory::new(crate::generator::FUEL_CAPACITY),
        }
    }

    /// The power sink a freshly built actor exposes, if any.
    pub(crate) fn starting_power_sink(&self) -> Option<PowerSink> {
        match self {
            Actor::Extractor(_) => Some(PowerSink::default()),
            _ => None,
        }
    }

    /// Run this actor's behavior for one tick.
    pub(crate) fn act(&mut self, id: ActorId, ctx: &mut ActCtx<'_>) -> Result<(), ActorError> {
        match self {
            Actor::Extractor(a) => a.act(id, ctx),
            Actor::Loader(a) => a.act(id, ctx),
            Actor::Conveyor(a) => a.act(id, ctx),
            Actor::Storage(a) => a.act(id, ctx),
            Actor::Generator(a) => a.act(id, ctx),
        }
    }
}
