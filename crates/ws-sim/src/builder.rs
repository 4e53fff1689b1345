//! Fluent builder for constructing a [`Sim`].

use tracing::info;
use ws_agents::{AgentStoreBuilder, ElfConfig, SnowmanConfig};
use ws_core::{SimConfig, SimRng, Vec3};
use ws_craft::Workshop;
use ws_steering::ObstacleRegistry;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, frame length, extents
/// - [`Workshop`]: catalog, stations and requested items
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                   |
/// |---------------------|---------------------------|
/// | `.elves(n, cfg)`    | no elves                  |
/// | `.snowmen(n, cfg)`  | no snowmen                |
/// | `.obstacle(p, r)`   | no static obstacles       |
///
/// # Example
///
/// ```rust,ignore
/// let workshop = Workshop::new(catalog, stations, requested)?;
/// let mut sim = SimBuilder::new(config, workshop)
///     .elves(8, ElfConfig::default())
///     .snowmen(3, SnowmanConfig::default())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    workshop:  Workshop,
    elves:     (usize, ElfConfig),
    snowmen:   (usize, SnowmanConfig),
    obstacles: Vec<(Vec3, f32)>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, workshop: Workshop) -> Self {
        Self {
            config,
            workshop,
            elves:     (0, ElfConfig::default()),
            snowmen:   (0, SnowmanConfig::default()),
            obstacles: Vec::new(),
        }
    }

    pub fn elves(mut self, count: usize, config: ElfConfig) -> Self {
        self.elves = (count, config);
        self
    }

    pub fn snowmen(mut self, count: usize, config: SnowmanConfig) -> Self {
        self.snowmen = (count, config);
        self
    }

    /// Add a permanent circular obstacle (a tree, a crate, a wall post).
    pub fn obstacle(mut self, position: Vec3, radius: f32) -> Self {
        self.obstacles.push((position, radius));
        self
    }

    /// Validate the configuration, spawn the agents and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let cfg = &self.config;
        cfg.validate()?;

        let mut obstacles = ObstacleRegistry::new();
        for &(position, radius) in &self.obstacles {
            if !(radius >= 0.0) || !position.is_finite() {
                return Err(SimError::Config(format!("invalid obstacle at {position} with radius {radius}")));
            }
            obstacles.insert(position, radius);
        }

        let mut rng = SimRng::new(cfg.seed);
        let (elf_count, elf_config) = self.elves;
        let (snowman_count, snowman_config) = self.snowmen;
        let (agents, rngs) = AgentStoreBuilder::new(cfg.seed)
            .elves(elf_count, elf_config)
            .snowmen(snowman_count, snowman_config)
            .build(cfg.elf_extents, cfg.snowman_extents, &mut rng)?;

        info!(
            seed     = cfg.seed,
            elves    = elf_count,
            snowmen  = snowman_count,
            stations = self.workshop.stations.len(),
            "simulation built"
        );
        Ok(Sim::new(self.config, agents, rngs, rng, self.workshop, obstacles))
    }
}
