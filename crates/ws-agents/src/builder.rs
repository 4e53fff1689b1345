//! Fluent builder for spawning the agent population.
//!
//! # Usage
//!
//! ```rust
//! use ws_agents::{AgentStoreBuilder, ElfConfig, SnowmanConfig};
//! use ws_core::{SimConfig, SimRng};
//!
//! let config = SimConfig::default();
//! let mut rng = SimRng::new(config.seed);
//! let (store, rngs) = AgentStoreBuilder::new(config.seed)
//!     .elves(10, ElfConfig::default())
//!     .snowmen(5, SnowmanConfig::default())
//!     .build(config.elf_extents, config.snowman_extents, &mut rng)
//!     .unwrap();
//!
//! assert_eq!(store.count, 15);
//! assert_eq!(rngs.len(), 15);
//! ```

use tracing::debug;
use ws_core::{Extents, SimRng, Vec3};
use ws_steering::KinematicBody;

use crate::{AgentError, AgentKind, AgentResult, AgentRngs, AgentStore, Elf, ElfConfig, Snowman, SnowmanConfig};

/// Rejection-sampling budget per snowman.
const MAX_SPAWN_ATTEMPTS: u32 = 10_000;

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// Elves get ids `0..elves`, snowmen the ids after them.
pub struct AgentStoreBuilder {
    seed:           u64,
    elf_count:      usize,
    elf_config:     ElfConfig,
    snowman_count:  usize,
    snowman_config: SnowmanConfig,
}

impl AgentStoreBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            elf_count:      0,
            elf_config:     ElfConfig::default(),
            snowman_count:  0,
            snowman_config: SnowmanConfig::default(),
        }
    }

    pub fn elves(mut self, count: usize, config: ElfConfig) -> Self {
        self.elf_count = count;
        self.elf_config = config;
        self
    }

    pub fn snowmen(mut self, count: usize, config: SnowmanConfig) -> Self {
        self.snowman_count = count;
        self.snowman_config = config;
        self
    }

    /// Validate configs and spawn.  Elves are placed uniformly inside
    /// `elf_extents`; snowmen uniformly inside `snowman_extents` but outside
    /// `elf_extents`, facing a random direction.
    pub fn build(self, elf_extents: Extents, snowman_extents: Extents, rng: &mut SimRng) -> AgentResult<(AgentStore, AgentRngs)> {
        self.elf_config.validate()?;
        self.snowman_config.validate()?;
        if self.snowman_count > 0 {
            let ring = snowman_extents.encloses(elf_extents)
                && (snowman_extents.half.x > elf_extents.half.x || snowman_extents.half.z > elf_extents.half.z);
            if !ring {
                return Err(AgentError::Config(
                    "snowman extents must enclose and exceed the elf extents".into(),
                ));
            }
        }

        let total = self.elf_count + self.snowman_count;
        let mut store = AgentStore::with_capacity(total);

        for _ in 0..self.elf_count {
            let cfg = &self.elf_config;
            let position = rng.point_in(elf_extents);
            let facing = Vec3::FORWARD.rotate_y(rng.range(0.0, 360.0));
            let body = KinematicBody::new(position, cfg.radius)
                .with_mass(cfg.mass)
                .with_friction(cfg.friction)
                .with_direction(facing);
            body.validate()?;
            store.push(body, cfg.steering.clone(), AgentKind::Elf(Elf::new(cfg.clone())));
        }

        for index in 0..self.snowman_count {
            let cfg = &self.snowman_config;
            let position = snowman_position(index, elf_extents, snowman_extents, rng)?;
            let facing = Vec3::FORWARD.rotate_y(rng.range(0.0, 360.0));
            let body = KinematicBody::new(position, cfg.radius)
                .with_mass(cfg.mass)
                .with_direction(facing);
            body.validate()?;
            store.push(body, cfg.steering.clone(), AgentKind::Snowman(Snowman::new(cfg.clone())));
        }

        debug!(elves = self.elf_count, snowmen = self.snowman_count, "agents spawned");
        let rngs = AgentRngs::new(total, self.seed);
        Ok((store, rngs))
    }
}

fn snowman_position(index: usize, elf: Extents, snowman: Extents, rng: &mut SimRng) -> AgentResult<Vec3> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let p = rng.point_in(snowman);
        if !elf.contains_xz(p) {
            return Ok(p);
        }
    }
    Err(AgentError::Spawn { index, attempts: MAX_SPAWN_ATTEMPTS })
}
