//! `ws-agents`: the elves and snowmen.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`store`]   | `AgentStore` (SoA arrays), `AgentRngs`, `AgentKind`             |
//! | [`builder`] | `AgentStoreBuilder`: spawns the population inside the extents  |
//! | [`elf`]     | `Elf`, `ElfState`: task-driven worker state machine             |
//! | [`snowman`] | `Snowman`, `SnowmanState`: wander and throw state machine       |
//! | [`context`] | `DecideContext`, `SteerContext`, `Snowball`                     |
//! | [`config`]  | `ElfConfig`, `SnowmanConfig`                                    |
//! | [`event`]   | `AgentEvent`                                                    |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Two calls per agent per tick
//!
//! 1. `AgentKind::decide` runs the state machine with mutable access to the
//!    workshop.  The tick loop calls it sequentially in ascending `AgentId`.
//! 2. `AgentKind::steer` computes the clamped steering force from a shared
//!    snapshot.  It touches only the agent's own wander angle and RNG.

pub mod builder;
pub mod config;
pub mod context;
pub mod elf;
pub mod error;
pub mod event;
pub mod snowman;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use config::{ElfConfig, SnowmanConfig};
pub use context::{DecideContext, Snowball, SteerContext};
pub use elf::{Elf, ElfState};
pub use error::{AgentError, AgentResult};
pub use event::AgentEvent;
pub use snowman::{Snowman, SnowmanState};
pub use store::{AgentKind, AgentRngs, AgentStore};
