//! End-to-end production-line scenarios: extraction timing, belt-chain
//! ordering, and loader throughput, driven through the engine facade the
//! way a real game would.

use beltline_core::actor::{ActorId, BuildingKind};
use beltline_core::coord::Direction;
use beltline_core::engine::Engine;
use beltline_core::item::{Inventory, ItemType};
use beltline_core::test_utils::*;

fn held(engine: &Engine, id: ActorId) -> &Inventory {
    engine.world.inventory(id).expect("actor has an inventory")
}

/// An extractor with the default delay of 5 on a 10-unit coal tile
/// extracts exactly one unit on tick 5 and nothing on ticks 1-4.
#[test]
fn extractor_fires_on_the_fifth_tick() {
    let mut engine = flat_engine();
    let mut player = rich_player();
    deposit(&mut engine, ItemType::Coal, 4, 4, 10);
    let id = engine
        .construct(BuildingKind::Extractor, 4, 4, None, &mut player)
        .unwrap();

    for tick in 1..=5u64 {
        engine.step();
        let held = engine.world.inventory(id).unwrap().count(ItemType::Coal);
        if tick < 5 {
            assert_eq!(held, 0, "tick {tick}: still cooling down");
        } else {
            assert_eq!(held, 1, "tick 5: exactly one unit");
        }
    }
    assert_eq!(
        engine.query_tile(4, 4).unwrap().resource_amount,
        9,
        "one unit left the ground"
    );

    // Fires again on tick 10, and every fifth tick after.
    for _ in 0..5 {
        engine.step();
    }
    assert_eq!(engine.world.inventory(id).unwrap().count(ItemType::Coal), 2);
}

/// Three chained conveyors A -> B -> C, C emptying into a storage box,
/// each segment holding one (distinct) item: a single tick moves C's item
/// into storage, B's into C, A's into B -- and no further.
#[test]
fn belt_chain_advances_one_segment_per_tick() {
    let mut engine = flat_engine();
    let mut player = rich_player();

    let a = engine
        .construct(BuildingKind::Conveyor, 2, 3, Some(Direction::East), &mut player)
        .unwrap();
    let b = engine
        .construct(BuildingKind::Conveyor, 3, 3, Some(Direction::East), &mut player)
        .unwrap();
    let c = engine
        .construct(BuildingKind::Conveyor, 4, 3, Some(Direction::East), &mut player)
        .unwrap();
    let bin = engine
        .construct(BuildingKind::Storage, 5, 3, None, &mut player)
        .unwrap();

    // Chain priorities: C is the end (100), then B, then A.
    assert_eq!(engine.world.actor(c).unwrap().priority(), 100);
    assert_eq!(engine.world.actor(b).unwrap().priority(), 101);
    assert_eq!(engine.world.actor(a).unwrap().priority(), 102);

    // Load one distinct item onto each segment.
    assert!(engine.world.inventory_mut(a).unwrap().add(ItemType::Iron, 1));
    assert!(engine.world.inventory_mut(b).unwrap().add(ItemType::Coal, 1));
    assert!(engine.world.inventory_mut(c).unwrap().add(ItemType::Copper, 1));

    engine.step();

    assert_eq!(held(&engine, bin).count(ItemType::Copper), 1, "C -> storage");
    assert_eq!(held(&engine, c).count(ItemType::Coal), 1, "B -> C");
    assert_eq!(held(&engine, b).count(ItemType::Iron), 1, "A -> B");
    assert!(held(&engine, a).is_empty(), "A drained, nothing further");
    assert_eq!(held(&engine, bin).total(), 1, "exactly one arrival");
}

/// A west-input loader moves exactly one unit per tick between two
/// storages, no matter how much is queued on either side.
#[test]
fn loader_throughput_is_one_unit_per_tick() {
    let mut engine = flat_engine();
    let mut player = rich_player();

    let source = engine
        .construct(BuildingKind::Storage, 1, 1, None, &mut player)
        .unwrap();
    let _loader = engine
        .construct(BuildingKind::Loader, 2, 1, Some(Direction::West), &mut player)
        .unwrap();
    let sink = engine
        .construct(BuildingKind::Storage, 3, 1, None, &mut player)
        .unwrap();

    assert!(engine.world.inventory_mut(source).unwrap().add(ItemType::Gold, 20));

    for tick in 1..=6u32 {
        engine.step();
        assert_eq!(
            engine.world.inventory(sink).unwrap().count(ItemType::Gold),
            tick,
            "one unit per tick"
        );
    }
    assert_eq!(engine.world.inventory(source).unwrap().count(ItemType::Gold), 14);
}

/// The full starter line drains a 10-unit deposit into the storage box and
/// the extractor shuts itself down when the ground is empty.
#[test]
fn full_line_drains_the_deposit() {
    let mut engine = flat_engine();
    let mut player = rich_player();
    deposit(&mut engine, ItemType::Coal, 0, 8, 10);
    let (bx, by) = build_line(&mut engine, &mut player, 0, 8, 3);

    for _ in 0..70 {
        engine.step();
    }

    let bin = engine.query_tile(bx, by).unwrap().actor.unwrap();
    assert_eq!(bin.items_held, 10, "every unit arrived");

    let extractor = engine.query_tile(0, 8).unwrap().actor.unwrap();
    assert!(!extractor.running, "extractor stopped on exhaustion");
    assert_eq!(engine.query_tile(0, 8).unwrap().deposit, None);
}

/// Priority bands put extraction before loading before belt transport,
/// regardless of construction order.
#[test]
fn priority_bands_hold_regardless_of_build_order() {
    let mut engine = flat_engine();
    let mut player = rich_player();

    // Built backwards: belt, then loader, then extractor.
    let belt = engine
        .construct(BuildingKind::Conveyor, 6, 6, Some(Direction::East), &mut player)
        .unwrap();
    let loader = engine
        .construct(BuildingKind::Loader, 5, 6, Some(Direction::West), &mut player)
        .unwrap();
    deposit(&mut engine, ItemType::Iron, 4, 6, 5);
    let extractor = engine
        .construct(BuildingKind::Extractor, 4, 6, None, &mut player)
        .unwrap();

    let p = |id| engine.world.actor(id).unwrap().priority();
    assert_eq!(p(extractor), 1);
    assert_eq!(p(loader), 2);
    assert!(p(belt) >= 100);
}

/// Deconstructing a mid-chain belt does NOT renumber the survivors; the
/// stale priorities persist until the next conveyor placement.
#[test]
fn deletion_leaves_chain_priorities_stale() {
    let mut engine = flat_engine();
    let mut player = rich_player();

    let mut belts = Vec::new();
    for x in 2..=5 {
        belts.push(
            engine
                .construct(BuildingKind::Conveyor, x, 9, Some(Direction::East), &mut player)
                .unwrap(),
        );
    }
    let p = |engine: &beltline_core::engine::Engine, id| {
        engine.world.actor(id).unwrap().priority()
    };
    assert_eq!(p(&engine, belts[3]), 100);
    assert_eq!(p(&engine, belts[0]), 103);

    // Remove the belt at x=4; upstream belts keep their old numbers.
    engine.deconstruct(4, 9, &mut player).unwrap();
    assert_eq!(p(&engine, belts[0]), 103, "stale, not recomputed");
    assert_eq!(p(&engine, belts[1]), 102, "stale, not recomputed");

    // The next placement re-runs propagation for the touched chain.
    engine
        .construct(BuildingKind::Conveyor, 4, 9, Some(Direction::East), &mut player)
        .unwrap();
    assert_eq!(p(&engine, belts[0]), 103);
    assert_eq!(p(&engine, belts[1]), 102);
    assert_eq!(p(&engine, belts[3]), 100);
}

/// A generator fed by a coal line powers the extractor next to it.
#[test]
fn generator_powers_an_adjacent_extractor() {
    let mut engine = flat_engine();
    let mut player = rich_player();

    deposit(&mut engine, ItemType::Coal, 2, 2, 50);
    let extractor = engine
        .construct(BuildingKind::Extractor, 2, 2, None, &mut player)
        .unwrap();
    let generator = engine
        .construct(BuildingKind::Generator, 3, 2, None, &mut player)
        .unwrap();
    assert!(
        engine
            .world
            .inventory_mut(generator)
            .unwrap()
            .add(ItemType::Coal, 5)
    );

    // Generator burns every 10 ticks; after the first burn the extractor's
    // sink reads the broadcast quantity.
    for _ in 0..10 {
        engine.step();
    }
    assert_eq!(
        engine.world.power_sink(extractor).unwrap().available,
        beltline_core::generator::POWER_OUTPUT
    );
    let summary = engine.query_tile(2, 2).unwrap().actor.unwrap();
    assert_eq!(
        summary.power_available,
        Some(beltline_core::generator::POWER_OUTPUT)
    );
}
