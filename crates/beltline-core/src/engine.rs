//! The engine facade: owns the world, the scheduler, and the buildable
//! registry, and exposes the operations the UI layer is allowed to call.
//!
//! Everything outside the core -- rendering, input handling, build menus --
//! goes through this surface: `construct`/`deconstruct` for mutation,
//! `query_tile` for display, and `step`/`advance`/`lock`/`unlock` for
//! driving time. Construction deducts its cost from a caller-supplied
//! player inventory; deconstruction refunds a configured fraction of it,
//! rounded up per line item.

use crate::actor::{Actor, ActorId, BuildingKind};
use crate::build::{BuildError, BuildableRegistry};
use crate::config::{ConfigError, GameConfig};
use crate::conveyor::{Conveyor, DEFAULT_CONVEYOR_DELAY};
use crate::coord::{Coordinate, Direction};
use crate::extractor::{DEFAULT_EXTRACTOR_DELAY, Extractor};
use crate::fixed::{Fixed64, Ticks, f64_to_fixed64};
use crate::generator::Generator;
use crate::grid::Grid;
use crate::item::Inventory;
use crate::loader::Loader;
use crate::query::{ActorSummary, TileQuery};
use crate::rng::SimRng;
use crate::scheduler::{AdvanceResult, Scheduler};
use crate::storage::Storage;
use crate::world::{PlaceError, World};
use crate::worldgen::{self, WorldGenError};

/// A failure while building an engine from configuration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WorldGen(#[from] WorldGenError),
}

impl From<PlaceError> for BuildError {
    fn from(error: PlaceError) -> Self {
        match error {
            PlaceError::OutOfBounds(pos) => BuildError::OutOfBounds(pos),
            PlaceError::Occupied(pos) => BuildError::Occupied(pos),
        }
    }
}

/// The top-level simulation object.
#[derive(Debug)]
pub struct Engine {
    pub world: World,
    scheduler: Scheduler,
    buildables: BuildableRegistry,
    refund_rate: Fixed64,
}

impl Engine {
    /// Build an engine from configuration with the standard buildable
    /// registry: validates the config, generates the resource map, and
    /// leaves the scheduler locked until [`Engine::start`].
    pub fn new(config: &GameConfig) -> Result<Self, EngineError> {
        Self::with_registry(config, BuildableRegistry::standard())
    }

    /// Build an engine with a caller-supplied buildable registry.
    pub fn with_registry(
        config: &GameConfig,
        buildables: BuildableRegistry,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut grid = Grid::new(config.map.width, config.map.height);
        let mut rng = SimRng::new(config.map.seed);
        worldgen::generate_deposits(&mut grid, &config.map.resources, &mut rng)?;
        Ok(Self {
            world: World::new(grid, rng),
            scheduler: Scheduler::new(config.game.frame_delay_ms, config.game.render_delay_ms),
            buildables,
            refund_rate: f64_to_fixed64(config.game.building_refund_rate),
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn buildables(&self) -> &BuildableRegistry {
        &self.buildables
    }

    /// The current tick counter.
    pub fn tick(&self) -> Ticks {
        self.scheduler.state.tick
    }

    // -- Construction -------------------------------------------------------

    /// Build `kind` at `(x, y)`, deducting its cost from `player`.
    ///
    /// For conveyors, `facing` is the output direction; for loaders it is
    /// the input direction (output is the opposite side). The new actor is
    /// registered with its tile and the scheduler and starts running.
    pub fn construct(
        &mut self,
        kind: BuildingKind,
        x: i32,
        y: i32,
        facing: Option<Direction>,
        player: &mut Inventory,
    ) -> Result<ActorId, BuildError> {
        let Some(spec) = self.buildables.get(kind) else {
            tracing::warn!(%kind, "construct request for unregistered kind");
            return Err(BuildError::UnknownKind(kind));
        };
        let spec = spec.clone();
        let pos = Coordinate::new(x, y);
        if !self.world.grid.contains(pos) {
            return Err(BuildError::OutOfBounds(pos));
        }
        if spec.requires_facing && facing.is_none() {
            tracing::warn!(%kind, %pos, "construct request without required facing");
            return Err(BuildError::MissingFacing(kind));
        }

        // Occupancy is checked immediately before construction; two
        // requests for one tile in the same tick are the caller's race to
        // avoid.
        if !self.world.grid.tile(pos).is_some_and(|t| t.is_vacant()) {
            tracing::warn!(%kind, %pos, "construct request for occupied tile");
            return Err(BuildError::Occupied(pos));
        }

        for entry in &spec.cost {
            let available = player.count(entry.item);
            if available < entry.quantity {
                return Err(BuildError::Unaffordable {
                    kind,
                    item: entry.item,
                    required: entry.quantity,
                    available,
                });
            }
        }

        let actor = match (kind, facing) {
            (BuildingKind::Extractor, _) => {
                Actor::Extractor(Extractor::new(pos, DEFAULT_EXTRACTOR_DELAY))
            }
            (BuildingKind::Loader, Some(input)) => Actor::Loader(Loader::new(pos, input)),
            (BuildingKind::Conveyor, Some(output)) => {
                Actor::Conveyor(Conveyor::new(pos, output, DEFAULT_CONVEYOR_DELAY))
            }
            (BuildingKind::Storage, _) => Actor::Storage(Storage::new(pos)),
            (BuildingKind::Generator, _) => Actor::Generator(Generator::new(pos)),
            (_, None) => return Err(BuildError::MissingFacing(kind)),
        };

        for entry in &spec.cost {
            let removed = player.remove(entry.item, entry.quantity);
            debug_assert_eq!(removed, entry.quantity, "affordability was checked");
        }

        match self.world.place(actor) {
            Ok(id) => {
                self.scheduler.add(id);
                Ok(id)
            }
            Err(error) => {
                // Give the cost back; nothing was built.
                for entry in &spec.cost {
                    let _ = player.add(entry.item, entry.quantity);
                }
                Err(error.into())
            }
        }
    }

    /// Tear down the building at `(x, y)`, refunding
    /// `ceil(cost * refund_rate)` for every cost line item into `player`.
    ///
    /// Tile and scheduler deregistration happen together, so the removed
    /// actor can never act again. Belt-chain priorities are NOT recomputed
    /// on removal.
    pub fn deconstruct(
        &mut self,
        x: i32,
        y: i32,
        player: &mut Inventory,
    ) -> Result<BuildingKind, BuildError> {
        let pos = Coordinate::new(x, y);
        if !self.world.grid.contains(pos) {
            return Err(BuildError::OutOfBounds(pos));
        }
        let Some(id) = self.world.grid.actor_at(pos) else {
            tracing::warn!(%pos, "deconstruct request for vacant tile");
            return Err(BuildError::VacantTile(pos));
        };
        let Some(kind) = self.world.actor(id).map(|a| a.kind()) else {
            return Err(BuildError::VacantTile(pos));
        };
        let Some(spec) = self.buildables.get(kind) else {
            tracing::warn!(%kind, %pos, "deconstruct request for unregistered kind");
            return Err(BuildError::UnknownKind(kind));
        };
        let spec = spec.clone();

        self.scheduler.remove(id);
        self.world.remove_at(pos);

        for entry in &spec.cost {
            let refund = (Fixed64::from_num(entry.quantity) * self.refund_rate)
                .ceil()
                .to_num::<u32>();
            if refund > 0 && !player.add(entry.item, refund) {
                tracing::warn!(
                    item = %entry.item,
                    refund,
                    "player inventory full, refund dropped"
                );
            }
        }
        Ok(kind)
    }

    // -- Queries ------------------------------------------------------------

    /// A read-only snapshot of the tile at `(x, y)` for display.
    pub fn query_tile(&self, x: i32, y: i32) -> Option<TileQuery> {
        let pos = Coordinate::new(x, y);
        let tile = self.world.grid.tile(pos)?;
        let actor = tile.actor().and_then(|id| {
            self.world.actor(id).map(|actor| ActorSummary {
                kind: actor.kind(),
                glyph: actor.glyph(),
                running: actor.is_running(),
                priority: actor.priority(),
                items_held: self
                    .world
                    .inventory(id)
                    .map(|inv| inv.total())
                    .unwrap_or(0),
                power_available: self.world.power_sink(id).map(|sink| sink.available),
            })
        });
        Some(TileQuery {
            position: pos,
            deposit: tile.deposit(),
            resource_amount: tile.resource_amount(),
            actor,
        })
    }

    // -- Time ---------------------------------------------------------------

    /// Unlock the scheduler and begin accepting `advance` time.
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Halt both cadences (reentrant).
    pub fn lock(&mut self) {
        self.scheduler.lock();
    }

    /// Resume after a matching [`Engine::lock`].
    ///
    /// # Panics
    ///
    /// Panics when the scheduler is not locked.
    pub fn unlock(&mut self) {
        self.scheduler.unlock();
    }

    /// Run exactly one tick, regardless of lock state. The deterministic
    /// path used by tests and headless drivers.
    pub fn step(&mut self) {
        self.scheduler.step(&mut self.world);
    }

    /// Feed elapsed wall time into the tick and render cadences.
    pub fn advance(
        &mut self,
        elapsed_ms: u64,
        render: impl FnMut(&World),
    ) -> AdvanceResult {
        self.scheduler.advance(&mut self.world, elapsed_ms, render)
    }
}
