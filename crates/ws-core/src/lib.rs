//! `ws-core`: foundational types for the elf workshop simulation.
//!
//! This crate is a dependency of every other `ws-*` crate.  It intentionally
//! has no `ws-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StationId`, `ItemId`, `TaskId`, `ObstacleId`  |
//! | [`math`]        | `Vec3`, `approximately`                                   |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`bounds`]      | `Extents` (axis-aligned world regions)                    |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`error`]       | `WsError`, `WsResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod bounds;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bounds::Extents;
pub use error::{WsError, WsResult};
pub use ids::{AgentId, ItemId, ObstacleId, StationId, TaskId};
pub use math::{Vec3, approximately};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
