//! The tile grid: a dense, fixed-size field of deposits and occupancy.
//!
//! The grid's shape is immutable after construction; tiles are allocated
//! once at map generation and persist for the run. Each tile holds at most
//! one actor (by ID -- the world's arena owns the actor itself) and at most
//! one resource deposit.

use crate::actor::ActorId;
use crate::coord::{Coordinate, Direction};
use crate::item::ItemType;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// One cell of the grid: an optional resource deposit plus occupancy.
///
/// Invariant: `resource_amount > 0` implies the deposit is set. Depleting
/// the deposit to 0 clears it permanently; deposits are non-renewable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    deposit: Option<ItemType>,
    resource_amount: u32,
    actor: Option<ActorId>,
}

impl Tile {
    pub fn deposit(&self) -> Option<ItemType> {
        self.deposit
    }

    pub fn resource_amount(&self) -> u32 {
        self.resource_amount
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn is_vacant(&self) -> bool {
        self.actor.is_none()
    }

    /// Used during map generation to commit a deposit into this tile.
    pub fn add_resources(&mut self, kind: ItemType, amount: u32) {
        self.deposit = Some(kind);
        self.resource_amount = amount;
    }

    /// Remove one unit of the deposit and return its type. Once the deposit
    /// is exhausted the tile is forced empty and every later call returns
    /// `None`; the amount never goes below zero.
    pub fn extract_resource(&mut self) -> Option<ItemType> {
        let kind = match self.deposit {
            Some(kind) if self.resource_amount > 0 => kind,
            _ => {
                self.deposit = None;
                return None;
            }
        };
        self.resource_amount -= 1;
        if self.resource_amount == 0 {
            self.deposit = None;
        }
        Some(kind)
    }

    /// Occupy this tile. Rejected when already occupied; the original
    /// occupant is retained.
    pub(crate) fn add_actor(&mut self, id: ActorId) -> bool {
        if self.actor.is_some() {
            return false;
        }
        self.actor = Some(id);
        true
    }

    /// Clear occupancy, but only for the matching occupant.
    pub(crate) fn remove_actor(&mut self, id: ActorId) -> bool {
        if self.actor != Some(id) {
            return false;
        }
        self.actor = None;
        true
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A dense W x H field of tiles, indexed by [`Coordinate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Allocate an all-empty grid. The shape never changes afterwards.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count. Also serves as the walk cap for chain traversals.
    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    fn index(&self, c: Coordinate) -> usize {
        (c.y as u32 * self.width + c.x as u32) as usize
    }

    pub fn tile(&self, c: Coordinate) -> Option<&Tile> {
        self.contains(c).then(|| &self.tiles[self.index(c)])
    }

    pub fn tile_mut(&mut self, c: Coordinate) -> Option<&mut Tile> {
        if self.contains(c) {
            let i = self.index(c);
            Some(&mut self.tiles[i])
        } else {
            None
        }
    }

    /// The in-bounds neighbor coordinate in the given direction, if any.
    pub fn neighbor(&self, c: Coordinate, direction: Direction) -> Option<Coordinate> {
        let next = c.step(direction);
        self.contains(next).then_some(next)
    }

    /// The ID of the actor occupying the tile at `c`, if any.
    pub fn actor_at(&self, c: Coordinate) -> Option<ActorId> {
        self.tile(c).and_then(|t| t.actor())
    }

    /// Iterate all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coordinate::new(x, y)))
    }
}
