//! The snowman: wanders the outer ring and lobs snowballs into the workshop.
//!
//! ```text
//!            off cooldown, roll succeeds              throw_state_duration
//! Wandering ─────────────────────────────▶ Throwing ──────────────────────▶ Wandering
//!                                             │
//!                                             └─ throw_time: release one snowball
//! ```

use tracing::{info, warn};
use ws_core::{AgentId, AgentRng, Vec3};
use ws_steering::{GRAVITY, KinematicBody, Projectile, Steering, SteeringParams, ballistic_launch_velocity};

use crate::{AgentEvent, DecideContext, Snowball, SnowmanConfig, SteerContext};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnowmanState {
    Wandering,
    Throwing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snowman {
    pub config:      SnowmanConfig,
    pub state:       SnowmanState,
    pub state_start: f32,
    /// Ground point the current throw aims at.
    pub throw_goal:  Vec3,
    pub has_thrown:  bool,
}

impl Snowman {
    pub fn new(config: SnowmanConfig) -> Self {
        Self {
            config,
            state:       SnowmanState::Wandering,
            state_start: 0.0,
            throw_goal:  Vec3::ZERO,
            has_thrown:  false,
        }
    }

    /// Chance of starting a throw during a frame of `dt` seconds, so the
    /// per-second rate holds regardless of frame length.
    pub fn throw_chance(&self, dt: f32) -> f32 {
        1.0 - (1.0 - self.config.throw_chance_per_sec).powf(dt.max(0.0))
    }

    // ── Decision phase ────────────────────────────────────────────────────────

    pub fn decide(
        &mut self,
        id:   AgentId,
        body: &mut KinematicBody,
        rng:  &mut AgentRng,
        ctx:  &mut DecideContext<'_>,
    ) {
        let elapsed = ctx.now - self.state_start;
        match self.state {
            SnowmanState::Wandering => {
                if elapsed > self.config.throw_cooldown && rng.unit() < self.throw_chance(ctx.dt) {
                    self.throw_goal = ctx.rng.point_in(ctx.elf_extents);
                    self.has_thrown = false;
                    self.set_state(SnowmanState::Throwing, id, ctx);
                }
            }
            SnowmanState::Throwing => {
                body.set_direction((self.throw_goal - body.position).flat());
                if elapsed >= self.config.throw_time && !self.has_thrown {
                    self.throw(id, body, ctx);
                    self.has_thrown = true;
                } else if elapsed >= self.config.throw_state_duration {
                    self.set_state(SnowmanState::Wandering, id, ctx);
                }
            }
        }
    }

    fn throw(&self, id: AgentId, body: &KinematicBody, ctx: &mut DecideContext<'_>) {
        let from = body.position + Vec3::UP * self.config.throw_height;
        let Some(velocity) = ballistic_launch_velocity(from, self.throw_goal, self.config.throw_angle, GRAVITY.y) else {
            warn!(agent = %id, %from, goal = %self.throw_goal, "no ballistic solution, throw skipped");
            return;
        };
        info!(agent = %id, goal = %self.throw_goal, "snowball thrown");
        ctx.snowballs.push(Snowball {
            projectile:  Projectile::new(from, velocity),
            thrower:     id,
            pile_radius: self.config.pile_radius,
            pile:        self.config.pile,
        });
        ctx.emit(AgentEvent::SnowballThrown { agent: id, from, target: self.throw_goal });
    }

    fn set_state(&mut self, next: SnowmanState, id: AgentId, ctx: &mut DecideContext<'_>) {
        if self.state != next {
            ctx.emit(AgentEvent::SnowmanStateChanged { agent: id, from: self.state, to: next });
            self.state = next;
            self.state_start = ctx.now;
        }
    }

    // ── Steering phase ────────────────────────────────────────────────────────

    pub fn steer(
        &self,
        body:   &KinematicBody,
        params: &SteeringParams,
        angle:  &mut f32,
        rng:    &mut AgentRng,
        ctx:    &SteerContext<'_>,
    ) -> Vec3 {
        let mut s = Steering::new(body, params);
        match self.state {
            SnowmanState::Wandering => {
                s.wander(angle, rng, ctx.dt, 1.0);
                s.avoid_all_obstacles(ctx.obstacles.obstacles(), 2.0);
                s.separate(ctx.bodies, 2.0);
                s.stay_in_bounds(ctx.snowman_extents.min(), ctx.snowman_extents.max(), 1.0);
                s.stay_out_of_bounds(ctx.elf_extents.min(), ctx.elf_extents.max(), 2.0);
            }
            SnowmanState::Throwing => s.stop(1.0),
        }
        s.finish()
    }
}
