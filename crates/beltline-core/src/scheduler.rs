//! The tick scheduler: actor registry, priority ordering, and cadence.
//!
//! # Tick model
//!
//! Exactly one logical thread drives the scheduler. Each [`Scheduler::step`]
//! stable-sorts the registered actors by priority (ascending) and invokes
//! every `act()` strictly sequentially -- no actor ever observes a sibling's
//! half-finished turn, and a tick always completes every registered actor
//! before the next one can begin. A failing actor is logged and skipped;
//! the tick continues for the rest.
//!
//! # Cadence
//!
//! There are no real timers. [`Scheduler::advance`] takes elapsed wall time
//! from the caller and accumulates it against two independently configured
//! intervals: the tick interval runs simulation steps, the render interval
//! invokes a read-only callback on committed post-tick state. Tests drive
//! `step()` directly and never need a clock.
//!
//! # Locking
//!
//! The lock is a reentrant counter. `lock()` increments it and halts both
//! cadences; `unlock()` decrements and resumes at zero. The scheduler is
//! born locked -- `start()` performs the first unlock. Unlocking an already
//! unlocked scheduler panics: that state is corrupt and cannot be safely
//! continued from.

use crate::actor::ActorId;
use crate::fixed::Ticks;
use crate::world::World;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable cadence state tracked by the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented by 1 for each completed step.
    pub tick: Ticks,

    /// Elapsed milliseconds not yet converted into ticks.
    pub tick_accumulator_ms: u64,

    /// Elapsed milliseconds not yet converted into renders.
    pub render_accumulator_ms: u64,
}

/// Result of an [`Scheduler::advance`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AdvanceResult {
    /// Simulation steps actually executed.
    pub steps_run: u64,

    /// Render callbacks actually invoked.
    pub renders_run: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Orders and invokes all registered actors once per tick.
///
/// The registry is non-owning: actor lifetime belongs to the world, and
/// registration is keyed by [`ActorId`]. Construction and deconstruction
/// register and deregister in the same operation, so an actor removed from
/// its tile never receives another `act()` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    registry: Vec<ActorId>,
    lock_count: u32,
    pub state: SimState,
    frame_delay_ms: u64,
    render_delay_ms: u64,
}

impl Scheduler {
    /// Create a scheduler with the given tick and render intervals. Born
    /// locked; call [`Scheduler::start`] to begin running.
    pub fn new(frame_delay_ms: u64, render_delay_ms: u64) -> Self {
        Self {
            registry: Vec::new(),
            lock_count: 1,
            state: SimState::default(),
            frame_delay_ms,
            render_delay_ms,
        }
    }

    /// Register an actor. Double registration is ignored.
    pub fn add(&mut self, id: ActorId) {
        if !self.registry.contains(&id) {
            self.registry.push(id);
        }
    }

    /// Deregister an actor. Unknown IDs are ignored.
    pub fn remove(&mut self, id: ActorId) {
        self.registry.retain(|r| *r != id);
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.registry.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Begin running: performs the initial unlock.
    pub fn start(&mut self) {
        self.unlock();
    }

    /// Halt both cadences. Reentrant; each `lock()` needs a matching
    /// `unlock()`.
    pub fn lock(&mut self) {
        self.lock_count += 1;
        tracing::debug!(lock_count = self.lock_count, "scheduler locked");
    }

    /// Resume when the counter reaches zero.
    ///
    /// # Panics
    ///
    /// Panics when the scheduler is not locked. This is engine misuse, not
    /// a recoverable error.
    pub fn unlock(&mut self) {
        if self.lock_count == 0 {
            panic!("cannot unlock an unlocked scheduler");
        }
        self.lock_count -= 1;
        tracing::debug!(lock_count = self.lock_count, "scheduler unlocked");
    }

    pub fn is_running(&self) -> bool {
        self.lock_count == 0
    }

    /// Run one full tick: every registered actor acts once, in stable
    /// ascending priority order. Ordering is resolved at the start of the
    /// step; registration order breaks ties within a band.
    pub fn step(&mut self, world: &mut World) {
        let mut order = self.registry.clone();
        order.sort_by_key(|id| {
            world
                .actor(*id)
                .map(|actor| actor.priority())
                .unwrap_or(u32::MAX)
        });

        for id in order {
            if let Err(error) = world.run_actor(id) {
                tracing::warn!(%error, "actor failed to act, skipping for this tick");
            }
        }
        self.state.tick += 1;
    }

    /// Feed elapsed wall time into both cadences. Does nothing while
    /// locked. The render callback only ever sees post-step state.
    pub fn advance(
        &mut self,
        world: &mut World,
        elapsed_ms: u64,
        mut render: impl FnMut(&World),
    ) -> AdvanceResult {
        let mut result = AdvanceResult::default();
        if !self.is_running() {
            return result;
        }

        self.state.tick_accumulator_ms += elapsed_ms;
        while self.state.tick_accumulator_ms >= self.frame_delay_ms {
            self.step(world);
            self.state.tick_accumulator_ms -= self.frame_delay_ms;
            result.steps_run += 1;
        }

        self.state.render_accumulator_ms += elapsed_ms;
        while self.state.render_accumulator_ms >= self.render_delay_ms {
            render(world);
            self.state.render_accumulator_ms -= self.render_delay_ms;
            result.renders_run += 1;
        }

        result
    }
}
