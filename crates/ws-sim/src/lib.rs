//! `ws-sim`: tick loop orchestrator for the elf workshop simulation.
//!
//! # Four-phase tick loop
//!
//! ```text
//! step(dt):
//!   ① World       : clock.advance(dt); snowballs fly, landed ones become
//!                   timed obstacles; melted piles are removed; launch pads
//!                   advance.
//!   ② Decision    : for each agent in ascending AgentId order:
//!                   elves take / walk to / process tasks,
//!                   snowmen wander, roll for a throw, release the snowball.
//!   ③ Steering    : every agent computes a clamped force from a read-only
//!                   snapshot of bodies and obstacles
//!                   (parallel with the `parallel` feature).
//!   ④ Integration : forces applied, bodies integrated with a capped step.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the steering phase on Rayon's thread pool.        |
//! | `serde`    | Forwards `serde` to every `ws-*` crate.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ws_agents::{ElfConfig, SnowmanConfig};
//! use ws_core::SimConfig;
//! use ws_craft::Workshop;
//! use ws_sim::{NoopObserver, SimBuilder};
//!
//! let workshop = Workshop::new(catalog, stations, requested)?;
//! let mut sim = SimBuilder::new(SimConfig::default(), workshop)
//!     .elves(8, ElfConfig::default())
//!     .snowmen(3, SnowmanConfig::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use event::SimEvent;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
