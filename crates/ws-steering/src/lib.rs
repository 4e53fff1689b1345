//! `ws-steering`: locomotion for every agent in the workshop.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`body`]       | `KinematicBody`: position/velocity/direction + integration      |
//! | [`obstacle`]   | `Obstacle`, `ObstacleRegistry`: handle-based circular obstacles  |
//! | [`steering`]   | `SteeringParams`, `Steering`: per-tick force accumulator         |
//! | [`avoid`]      | `plan_detour`, `Route`: tangent routing around obstacles        |
//! | [`projectile`] | `Projectile`, `PileTimer`, `ballistic_launch_velocity`          |
//! | [`error`]      | `SteeringError`, `SteeringResult<T>`                            |
//!
//! # Force model
//!
//! Each tick an agent builds one [`Steering`] over an immutable view of its
//! own body, calls any number of primitives (each adds a weighted force),
//! and then [`Steering::finish`] clamps the sum to `max_force`.  The
//! caller applies the result with [`KinematicBody::apply_force`] and later
//! integrates.  Nothing in this crate mutates shared state, so the force
//! pass can run for all agents in parallel.

pub mod avoid;
pub mod body;
pub mod error;
pub mod obstacle;
pub mod projectile;
pub mod steering;

#[cfg(test)]
mod tests;

pub use avoid::{Route, circle_circle_intersection, plan_detour};
pub use body::KinematicBody;
pub use error::{SteeringError, SteeringResult};
pub use obstacle::{Obstacle, ObstacleRegistry};
pub use projectile::{GRAVITY, PileTimer, Projectile, ProjectileStep, ballistic_launch_velocity};
pub use steering::{Steering, SteeringParams};
