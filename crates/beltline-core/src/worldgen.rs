//! Procedural resource-field generation.
//!
//! For each configured resource kind, in declaration order: seed a boolean
//! cellular-automaton field at the configured per-cell probability, smooth
//! it for the configured number of generations, and reject-and-regenerate
//! the whole field until its live-cell count exceeds the configured
//! minimum. Accepted fields commit into the grid; only tiles still empty
//! receive a deposit, so earlier-declared resources win contested cells.
//!
//! Per-tile richness rewards the vein interior: the committed amount is
//! `base_amount_per_tile + live_neighbors * amount_per_additional_tile`,
//! where neighbors are counted in the same boolean field, so cells deep in
//! a vein hold more than its fringe.

use crate::config::ResourceFieldConfig;
use crate::fixed::f64_to_fixed64;
use crate::grid::Grid;
use crate::item::ItemType;
use crate::rng::SimRng;

/// Attempts per field before generation gives up. A field that cannot meet
/// its minimum (e.g. `base_chance` 0) fails loudly instead of spinning.
pub const MAX_FIELD_ATTEMPTS: u32 = 1000;

/// Smoothing rule thresholds over the live 8-neighbor count: live cells
/// survive at 4+, dead cells are born at 5+.
const SURVIVE_MIN: u32 = 4;
const BIRTH_MIN: u32 = 5;

/// A field that never produced enough live cells.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "resource field for {kind} rejected {attempts} times without exceeding {min_tiles} tiles"
)]
pub struct WorldGenError {
    pub kind: ItemType,
    pub attempts: u32,
    pub min_tiles: u32,
}

/// Per-field summary returned to the caller after a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub kind: ItemType,
    /// Tiles that went live in the accepted boolean field.
    pub live_cells: u32,
    /// Tiles that actually received a deposit (live minus already-claimed).
    pub committed_tiles: u32,
    /// Fields generated before one was accepted (1 = first try).
    pub attempts: u32,
}

/// Generate and commit every configured resource field, in declared order.
pub fn generate_deposits(
    grid: &mut Grid,
    fields: &[ResourceFieldConfig],
    rng: &mut SimRng,
) -> Result<Vec<FieldReport>, WorldGenError> {
    let mut reports = Vec::with_capacity(fields.len());
    for field in fields {
        let report = generate_field(grid, field, rng)?;
        tracing::debug!(
            kind = %report.kind,
            live = report.live_cells,
            committed = report.committed_tiles,
            attempts = report.attempts,
            "resource field committed"
        );
        reports.push(report);
    }
    Ok(reports)
}

fn generate_field(
    grid: &mut Grid,
    field: &ResourceFieldConfig,
    rng: &mut SimRng,
) -> Result<FieldReport, WorldGenError> {
    let (w, h) = (grid.width() as usize, grid.height() as usize);
    let chance = f64_to_fixed64(field.base_chance);

    for attempt in 1..=MAX_FIELD_ATTEMPTS {
        let mut cells: Vec<bool> = (0..w * h).map(|_| rng.chance(chance)).collect();
        for _ in 0..field.generations {
            cells = smooth(&cells, w, h);
        }

        let live_cells = cells.iter().filter(|c| **c).count() as u32;
        if live_cells <= field.min_tiles {
            continue;
        }

        let committed_tiles = commit(grid, field, &cells, w, h);
        return Ok(FieldReport {
            kind: field.kind,
            live_cells,
            committed_tiles,
            attempts: attempt,
        });
    }

    Err(WorldGenError {
        kind: field.kind,
        attempts: MAX_FIELD_ATTEMPTS,
        min_tiles: field.min_tiles,
    })
}

/// One smoothing generation of the automaton.
fn smooth(cells: &[bool], w: usize, h: usize) -> Vec<bool> {
    let mut next = vec![false; cells.len()];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let n = live_neighbors(cells, w, h, x, y);
            next[i] = if cells[i] { n >= SURVIVE_MIN } else { n >= BIRTH_MIN };
        }
    }
    next
}

/// Live cells among the up-to-8 surrounding cells.
fn live_neighbors(cells: &[bool], w: usize, h: usize, x: usize, y: usize) -> u32 {
    let mut count = 0;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                continue;
            }
            if cells[ny as usize * w + nx as usize] {
                count += 1;
            }
        }
    }
    count
}

/// Write the accepted field into the grid. Tiles already holding an
/// earlier-declared deposit are skipped.
fn commit(
    grid: &mut Grid,
    field: &ResourceFieldConfig,
    cells: &[bool],
    w: usize,
    h: usize,
) -> u32 {
    let mut committed = 0;
    for y in 0..h {
        for x in 0..w {
            if !cells[y * w + x] {
                continue;
            }
            let coord = crate::coord::Coordinate::new(x as i32, y as i32);
            let Some(tile) = grid.tile_mut(coord) else {
                continue;
            };
            if tile.deposit().is_some() {
                continue;
            }
            let richness = live_neighbors(cells, w, h, x, y);
            let amount =
                field.base_amount_per_tile + richness * field.amount_per_additional_tile;
            tile.add_resources(field.kind, amount);
            committed += 1;
        }
    }
    committed
}
