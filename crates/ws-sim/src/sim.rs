//! The `Sim` struct and its tick loop.

use tracing::{debug, trace};
use ws_agents::{AgentEvent, AgentRngs, AgentStore, DecideContext, Snowball, SteerContext};
use ws_core::{AgentId, ItemId, SimClock, SimConfig, SimRng, StationId, Tick, Vec3};
use ws_craft::Workshop;
use ws_steering::{ObstacleRegistry, ProjectileStep};

use crate::{SimEvent, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` holds all simulation state and drives the four-phase tick loop:
///
/// 1. **World** (sequential): advance the clock, fly snowballs (a landing
///    one leaves a timed obstacle), melt expired obstacles, step launch pads.
/// 2. **Decision** (sequential, ascending `AgentId`): state machines run
///    with mutable access to the workshop; this is where tasks are taken and
///    station hooks fire.
/// 3. **Steering** (optionally parallel with the `parallel` feature): every
///    agent computes its clamped force from a read-only snapshot.
/// 4. **Integration** (sequential): forces are applied and bodies advance.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Agent state (SoA arrays).
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Global RNG for throw goals.
    pub rng: SimRng,

    /// Catalog, stations and taskmaster.
    pub workshop: Workshop,

    pub obstacles: ObstacleRegistry,

    /// Snowballs in flight.
    pub snowballs: Vec<Snowball>,

    /// Agent events produced during the current tick.
    agent_events: Vec<AgentEvent>,

    /// Forces from the steering phase, reused between ticks.
    forces: Vec<Vec3>,
}

impl Sim {
    pub(crate) fn new(
        config:    SimConfig,
        agents:    AgentStore,
        rngs:      AgentRngs,
        rng:       SimRng,
        workshop:  Workshop,
        obstacles: ObstacleRegistry,
    ) -> Self {
        Self {
            config,
            clock: SimClock::new(),
            forces: Vec::with_capacity(agents.count),
            agents,
            rngs,
            rng,
            workshop,
            obstacles,
            snowballs: Vec::new(),
            agent_events: Vec::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()` with
    /// `config.fixed_delta_secs` frames.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(self.config.fixed_delta_secs, observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` fixed-length ticks (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(self.config.fixed_delta_secs, observer)?;
        }
        Ok(())
    }

    /// Advance one frame of `dt` seconds supplied by the host.
    pub fn step<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> SimResult<()> {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        self.world_phase(dt);
        self.flush_events(tick, observer);

        self.decision_phase();
        self.flush_events(tick, observer);

        self.steering_phase();
        self.integration_phase();

        observer.on_tick_end(tick, &self.clock);
        Ok(())
    }

    /// Inbound UI call: start building `item` at `station`.
    pub fn begin_building_item(&mut self, item: ItemId, station: StationId) -> bool {
        self.workshop.begin_building_item(item, station)
    }

    /// Items the user may currently start building.
    pub fn buildable_items(&self) -> Vec<ItemId> {
        self.workshop.taskmaster.buildable_items(&self.workshop.catalog)
    }

    #[inline]
    pub fn now(&self) -> f32 {
        self.clock.time
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn world_phase(&mut self, dt: f32) {
        self.clock.advance(dt);
        let now = self.clock.time;
        let dt = self.clock.delta;

        let obstacles = &mut self.obstacles;
        let events = &mut self.agent_events;
        self.snowballs.retain_mut(|ball| match ball.projectile.step(dt) {
            ProjectileStep::Flying => true,
            ProjectileStep::Landed(position) => {
                let id = obstacles.insert_timed(position, ball.pile_radius, now, ball.pile);
                debug!(obstacle = %id, %position, "snow pile spawned");
                events.push(AgentEvent::ObstacleSpawned { obstacle: id, position, thrower: ball.thrower });
                false
            }
        });

        for id in self.obstacles.expire(now) {
            debug!(obstacle = %id, "snow pile melted");
            self.agent_events.push(AgentEvent::ObstacleMelted { obstacle: id });
        }

        self.workshop.update(now, dt);
    }

    fn decision_phase(&mut self) {
        let mut ctx = DecideContext {
            now:         self.clock.time,
            dt:          self.clock.delta,
            elf_extents: self.config.elf_extents,
            workshop:    &mut self.workshop,
            rng:         &mut self.rng,
            events:      &mut self.agent_events,
            snowballs:   &mut self.snowballs,
        };
        let agents = &mut self.agents;
        for i in 0..agents.count {
            let id = AgentId(i as u32);
            agents.kinds[i].decide(id, &mut agents.bodies[i], self.rngs.get_mut(id), &mut ctx);
        }
    }

    fn steering_phase(&mut self) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let bodies = self.agents.bodies.as_slice();
        let params = self.agents.params.as_slice();
        let kinds = self.agents.kinds.as_slice();
        let angles = &mut self.agents.wander_angle;
        let rngs = &mut self.rngs.inner;

        let ctx = SteerContext {
            dt:              self.clock.delta,
            bodies,
            obstacles:       &self.obstacles,
            elf_extents:     self.config.elf_extents,
            snowman_extents: self.config.snowman_extents,
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.forces.clear();
            self.forces.extend(
                angles
                    .iter_mut()
                    .zip(rngs.iter_mut())
                    .enumerate()
                    .map(|(i, (angle, rng))| kinds[i].steer(&bodies[i], &params[i], angle, rng, &ctx)),
            );
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.forces = angles
                .par_iter_mut()
                .zip(rngs.par_iter_mut())
                .enumerate()
                .map(|(i, (angle, rng))| kinds[i].steer(&bodies[i], &params[i], angle, rng, &ctx))
                .collect();
        }
    }

    fn integration_phase(&mut self) {
        let dt = self.clock.delta;
        let max_step = self.config.max_integration_step;
        for (body, &force) in self.agents.bodies.iter_mut().zip(&self.forces) {
            body.apply_force(force);
            body.integrate(dt, max_step);
        }
        trace!(tick = %self.clock.current_tick, "bodies integrated");
    }

    /// Hand buffered events to the observer: agent events first, then
    /// workshop events.
    fn flush_events<O: SimObserver>(&mut self, tick: Tick, observer: &mut O) {
        for e in self.agent_events.drain(..) {
            observer.on_event(tick, &SimEvent::Agent(e));
        }
        for e in self.workshop.drain_events() {
            observer.on_event(tick, &SimEvent::Workshop(e));
        }
    }
}
