//! Per-tick views handed to agent state machines.
//!
//! A tick gives agents two different views of the world:
//!
//! - [`DecideContext`] during the sequential decision phase.  It holds the
//!   only mutable borrow of the workshop, so task taking and station hooks
//!   happen one agent at a time in ascending `AgentId` order.
//! - [`SteerContext`] during the steering phase.  Everything in it is
//!   shared and read-only, so it is `Sync` and the force pass may run on a
//!   thread pool.

use ws_core::{AgentId, Extents, SimRng};
use ws_craft::Workshop;
use ws_steering::{KinematicBody, ObstacleRegistry, PileTimer, Projectile};

use crate::AgentEvent;

/// A snowball in flight, with what it leaves behind when it lands.
#[derive(Clone, Debug, PartialEq)]
pub struct Snowball {
    pub projectile:  Projectile,
    pub thrower:     AgentId,
    pub pile_radius: f32,
    pub pile:        PileTimer,
}

pub struct DecideContext<'a> {
    /// Sim time in seconds after this tick's clock advance.
    pub now:         f32,
    pub dt:          f32,
    pub elf_extents: Extents,
    pub workshop:    &'a mut Workshop,
    /// Global draws such as throw goals.
    pub rng:         &'a mut SimRng,
    pub events:      &'a mut Vec<AgentEvent>,
    /// Snowballs thrown this tick.
    pub snowballs:   &'a mut Vec<Snowball>,
}

impl DecideContext<'_> {
    #[inline]
    pub fn emit(&mut self, event: AgentEvent) {
        self.events.push(event);
    }
}

#[derive(Clone, Copy)]
pub struct SteerContext<'a> {
    pub dt:              f32,
    /// Every agent's body, indexed by `AgentId`.
    pub bodies:          &'a [KinematicBody],
    pub obstacles:       &'a ObstacleRegistry,
    pub elf_extents:     Extents,
    pub snowman_extents: Extents,
}
