//! Headless demo: the classic starter line.
//!
//! Builds an extractor on a coal deposit, a loader, three conveyors, a
//! second loader, and a storage box, then drives the engine with synthetic
//! time and prints the map and the box contents. Run with:
//!
//! ```text
//! cargo run --example headless_line
//! ```

use beltline_core::actor::BuildingKind;
use beltline_core::config::GameConfig;
use beltline_core::coord::Direction;
use beltline_core::engine::Engine;
use beltline_core::item::{Inventory, ItemType};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = GameConfig::default();
    config.map.width = 20;
    config.map.height = 10;
    config.map.resources.clear();
    config.game.frame_delay_ms = 50;
    config.game.render_delay_ms = 200;

    let mut engine = Engine::new(&config).expect("valid config");
    engine
        .world
        .grid
        .tile_mut(beltline_core::coord::Coordinate::new(5, 5))
        .expect("in bounds")
        .add_resources(ItemType::Coal, 10);

    let mut player = Inventory::new(10_000);
    assert!(player.add(ItemType::Iron, 5_000));

    engine
        .construct(BuildingKind::Extractor, 5, 5, None, &mut player)
        .expect("extractor");
    engine
        .construct(BuildingKind::Loader, 6, 5, Some(Direction::West), &mut player)
        .expect("loader");
    for x in 7..=9 {
        engine
            .construct(BuildingKind::Conveyor, x, 5, Some(Direction::East), &mut player)
            .expect("conveyor");
    }
    engine
        .construct(BuildingKind::Loader, 10, 5, Some(Direction::West), &mut player)
        .expect("loader");
    engine
        .construct(BuildingKind::Storage, 11, 5, None, &mut player)
        .expect("storage");

    engine.start();

    // Two simulated seconds in 100ms slices; renders fire on their own
    // cadence and only read committed state.
    for _ in 0..20 {
        engine.advance(100, |world| {
            let mut screen = String::new();
            for y in 0..world.grid.height() as i32 {
                for x in 0..world.grid.width() as i32 {
                    let c = beltline_core::coord::Coordinate::new(x, y);
                    let glyph = match world.actor_at(c) {
                        Some(actor) => actor.glyph(),
                        None if world.grid.tile(c).is_some_and(|t| t.deposit().is_some()) => '*',
                        None => '.',
                    };
                    screen.push(glyph);
                }
                screen.push('\n');
            }
            println!("{screen}");
        });
    }

    let bin = engine.query_tile(11, 5).expect("in bounds");
    let held = bin.actor.map(|a| a.items_held).unwrap_or(0);
    tracing::info!(tick = engine.tick(), held, "run complete");
}
