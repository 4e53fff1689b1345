//! Circular obstacles with stable handles.
//!
//! # Mutation discipline
//!
//! The registry is mutated only from the sequential phases of a tick
//! (projectile landings, melting).  During the steering phase it is borrowed
//! immutably by every agent, so an obstacle can never appear or disappear
//! halfway through a force pass.  Handles are never reused: removing an
//! obstacle and inserting another never aliases the old `ObstacleId`.

use tracing::trace;
use ws_core::{ObstacleId, Vec3};

use crate::PileTimer;

/// A circle on the ground plane that agents steer around.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub position: Vec3,
    pub radius:   f32,
    /// Sim time at which the obstacle is removed, for timed snow piles.
    pub expires_at: Option<f32>,
}

impl Obstacle {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius, expires_at: None }
    }
}

/// Flat, insertion-ordered obstacle store.
#[derive(Default, Debug)]
pub struct ObstacleRegistry {
    entries: Vec<(ObstacleId, Obstacle)>,
    next_id: u32,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, obstacle));
        id
    }

    /// Add a permanent obstacle.
    pub fn insert(&mut self, position: Vec3, radius: f32) -> ObstacleId {
        self.allocate(Obstacle::new(position, radius))
    }

    /// Add an obstacle that [`expire`](Self::expire) removes once
    /// `timer.lifetime()` seconds have passed since `now`.
    pub fn insert_timed(&mut self, position: Vec3, radius: f32, now: f32, timer: PileTimer) -> ObstacleId {
        let id = self.allocate(Obstacle {
            position,
            radius,
            expires_at: Some(now + timer.lifetime()),
        });
        trace!(%id, %position, expires_at = now + timer.lifetime(), "timed obstacle inserted");
        id
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let idx = self.entries.iter().position(|(eid, _)| *eid == id)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.entries.iter().find(|(eid, _)| *eid == id).map(|(_, o)| o)
    }

    /// Remove every timed obstacle whose expiry is at or before `now`.
    /// Returns the removed handles in insertion order.
    pub fn expire(&mut self, now: f32) -> Vec<ObstacleId> {
        let mut removed = Vec::new();
        self.entries.retain(|(id, o)| match o.expires_at {
            Some(t) if now >= t => {
                removed.push(*id);
                false
            }
            _ => true,
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.entries.iter().map(|(id, o)| (*id, o))
    }

    /// All obstacles, without handles.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + Clone {
        self.entries.iter().map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
