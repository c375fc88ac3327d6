//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these
//! helpers are available in unit tests, integration tests, and benchmarks
//! (via the `test-utils` feature).

use crate::actor::BuildingKind;
use crate::config::GameConfig;
use crate::coord::{Coordinate, Direction};
use crate::engine::Engine;
use crate::item::{Inventory, ItemType};

/// A config with no resource fields and a small map: deterministic and
/// instant to generate. Deposits are placed directly where tests need
/// them.
pub fn flat_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.map.width = 16;
    config.map.height = 16;
    config.map.resources.clear();
    config
}

/// An engine on a flat 16x16 map, still locked.
pub fn flat_engine() -> Engine {
    Engine::new(&flat_config()).expect("flat config is valid")
}

/// A player inventory wealthy enough for any test build-out.
pub fn rich_player() -> Inventory {
    let mut player = Inventory::new(1_000_000);
    for kind in ItemType::all() {
        assert!(player.add(kind, 100_000));
    }
    player
}

/// Put `amount` of `kind` into the ground at `(x, y)`.
pub fn deposit(engine: &mut Engine, kind: ItemType, x: i32, y: i32, amount: u32) {
    engine
        .world
        .grid
        .tile_mut(Coordinate::new(x, y))
        .expect("coordinate inside the map")
        .add_resources(kind, amount);
}

/// Build a west-to-east line at row `y`, starting at `x`:
/// extractor, loader, `belts` conveyors, loader, storage box.
/// Returns the storage box's coordinates.
pub fn build_line(
    engine: &mut Engine,
    player: &mut Inventory,
    x: i32,
    y: i32,
    belts: i32,
) -> (i32, i32) {
    engine
        .construct(BuildingKind::Extractor, x, y, None, player)
        .expect("extractor");
    engine
        .construct(BuildingKind::Loader, x + 1, y, Some(Direction::West), player)
        .expect("feed loader");
    for i in 0..belts {
        engine
            .construct(
                BuildingKind::Conveyor,
                x + 2 + i,
                y,
                Some(Direction::East),
                player,
            )
            .expect("conveyor");
    }
    engine
        .construct(
            BuildingKind::Loader,
            x + 2 + belts,
            y,
            Some(Direction::West),
            player,
        )
        .expect("drain loader");
    engine
        .construct(BuildingKind::Storage, x + 3 + belts, y, None, player)
        .expect("storage");
    (x + 3 + belts, y)
}
