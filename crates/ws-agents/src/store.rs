//! Agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The steering phase needs `&mut` access to each agent's RNG and wander
//! angle while every agent reads all bodies through `&`.  Keeping the RNGs
//! in their own struct, and the wander angles in their own `Vec`, lets the
//! tick loop split the borrow field by field:
//!
//! ```ignore
//! let bodies = &store.bodies;
//! let forces: Vec<Vec3> = store.wander_angle
//!     .par_iter_mut()
//!     .zip(rngs.inner.par_iter_mut())
//!     .enumerate()
//!     .map(|(i, (angle, rng))| store.kinds[i].steer(&bodies[i], &store.params[i], angle, rng, &ctx))
//!     .collect();
//! ```

use ws_core::{AgentId, AgentRng, Vec3};
use ws_steering::{KinematicBody, SteeringParams};

use crate::{DecideContext, Elf, SteerContext, Snowman};

// ── AgentKind ─────────────────────────────────────────────────────────────────

/// Closed set of agent behaviors.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentKind {
    Elf(Elf),
    Snowman(Snowman),
}

impl AgentKind {
    pub fn as_elf(&self) -> Option<&Elf> {
        match self {
            AgentKind::Elf(e) => Some(e),
            AgentKind::Snowman(_) => None,
        }
    }

    pub fn as_snowman(&self) -> Option<&Snowman> {
        match self {
            AgentKind::Snowman(s) => Some(s),
            AgentKind::Elf(_) => None,
        }
    }

    /// Run this agent's state machine for the tick.
    pub fn decide(&mut self, id: AgentId, body: &mut KinematicBody, rng: &mut AgentRng, ctx: &mut DecideContext<'_>) {
        match self {
            AgentKind::Elf(e) => e.decide(id, body, ctx),
            AgentKind::Snowman(s) => s.decide(id, body, rng, ctx),
        }
    }

    /// Clamped steering force for the tick.
    pub fn steer(
        &self,
        body:   &KinematicBody,
        params: &SteeringParams,
        angle:  &mut f32,
        rng:    &mut AgentRng,
        ctx:    &SteerContext<'_>,
    ) -> Vec3 {
        match self {
            AgentKind::Elf(e) => e.steer(body, params, angle, rng, ctx),
            AgentKind::Snowman(s) => s.steer(body, params, angle, rng, ctx),
        }
    }
}

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, kept apart from [`AgentStore`] so the
/// steering phase can hold `&mut AgentRngs` next to `&AgentStore` bodies.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` has exactly `count` elements and `AgentId` is the index into
/// all of them.  Elves occupy the low ids, snowmen follow.
pub struct AgentStore {
    pub count: usize,

    pub bodies: Vec<KinematicBody>,

    /// Base steering tunables (elves override `max_speed` per state).
    pub params: Vec<SteeringParams>,

    /// Persistent wander angle in degrees.
    pub wander_angle: Vec<f32>,

    pub kinds: Vec<AgentKind>,
}

impl AgentStore {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    pub fn elf(&self, agent: AgentId) -> Option<&Elf> {
        self.kinds.get(agent.index())?.as_elf()
    }

    pub fn snowman(&self, agent: AgentId) -> Option<&Snowman> {
        self.kinds.get(agent.index())?.as_snowman()
    }

    pub fn elves(&self) -> impl Iterator<Item = (AgentId, &Elf)> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.as_elf().map(|e| (AgentId(i as u32), e)))
    }

    pub fn snowmen(&self) -> impl Iterator<Item = (AgentId, &Snowman)> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.as_snowman().map(|s| (AgentId(i as u32), s)))
    }

    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            count:        0,
            bodies:       Vec::with_capacity(count),
            params:       Vec::with_capacity(count),
            wander_angle: Vec::with_capacity(count),
            kinds:        Vec::with_capacity(count),
        }
    }

    pub(crate) fn push(&mut self, body: KinematicBody, params: SteeringParams, kind: AgentKind) -> AgentId {
        let id = AgentId(self.count as u32);
        self.bodies.push(body);
        self.params.push(params);
        self.wander_angle.push(0.0);
        self.kinds.push(kind);
        self.count += 1;
        id
    }
}
