//! Buildable specifications: what each building kind costs to construct
//! and whether it needs a facing.
//!
//! Capability checks live in data, not in the building types: `construct`
//! consults a [`BuildableRegistry`] keyed by [`BuildingKind`]. The registry
//! is frozen after construction and shared for the run.

use crate::actor::BuildingKind;
use crate::coord::Coordinate;
use crate::item::ItemType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line item of a build cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub item: ItemType,
    pub quantity: u32,
}

/// The buildable record for one building kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildableSpec {
    pub kind: BuildingKind,
    pub cost: Vec<CostEntry>,
    pub requires_facing: bool,
}

/// Immutable kind -> spec table consulted by construct/deconstruct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildableRegistry {
    specs: BTreeMap<BuildingKind, BuildableSpec>,
}

impl BuildableRegistry {
    /// An empty registry. Useful for games that define their own costs.
    pub fn new() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// The stock registry with every standard building kind.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(BuildableSpec {
            kind: BuildingKind::Extractor,
            cost: vec![CostEntry {
                item: ItemType::Iron,
                quantity: 100,
            }],
            requires_facing: false,
        });
        registry.register(BuildableSpec {
            kind: BuildingKind::Loader,
            cost: vec![CostEntry {
                item: ItemType::Iron,
                quantity: 75,
            }],
            requires_facing: true,
        });
        registry.register(BuildableSpec {
            kind: BuildingKind::Conveyor,
            cost: vec![CostEntry {
                item: ItemType::Iron,
                quantity: 50,
            }],
            requires_facing: true,
        });
        registry.register(BuildableSpec {
            kind: BuildingKind::Storage,
            cost: vec![CostEntry {
                item: ItemType::Iron,
                quantity: 50,
            }],
            requires_facing: false,
        });
        registry.register(BuildableSpec {
            kind: BuildingKind::Generator,
            cost: vec![CostEntry {
                item: ItemType::Iron,
                quantity: 300,
            }],
            requires_facing: false,
        });
        registry
    }

    /// Add or replace a spec.
    pub fn register(&mut self, spec: BuildableSpec) {
        self.specs.insert(spec.kind, spec);
    }

    pub fn get(&self, kind: BuildingKind) -> Option<&BuildableSpec> {
        self.specs.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BuildingKind> + '_ {
        self.specs.keys().copied()
    }
}

impl Default for BuildableRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// A rejected construct/deconstruct request. All variants leave the world,
/// the scheduler, and the player inventory untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no buildable spec registered for {0}")]
    UnknownKind(BuildingKind),

    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coordinate),

    #[error("{0} requires a facing direction")]
    MissingFacing(BuildingKind),

    #[error("tile {0} is already occupied")]
    Occupied(Coordinate),

    #[error("cannot afford {kind}: need {required} {item}, have {available}")]
    Unaffordable {
        kind: BuildingKind,
        item: ItemType,
        required: u32,
        available: u32,
    },

    #[error("no building at {0} to deconstruct")]
    VacantTile(Coordinate),
}
