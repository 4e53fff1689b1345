//! `ws-craft`: what the elves work on.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`item`]       | `ItemType`, `ItemCatalog`: recipe DAG + cycle validation      |
//! | [`station`]    | `Station`, `StationKind`, `ToyStation`, `ActionCircle`       |
//! | [`launch`]     | `LaunchPad`, `LaunchPhase`, `LaunchPadParams`                |
//! | [`task`]       | `Task`, `TaskKind`, `TaskTimings`, `Worker`, `CraftContext`  |
//! | [`taskmaster`] | `Taskmaster`, `Demand`: task pool and crafting demand        |
//! | [`workshop`]   | `Workshop`: context struct running task lifecycle hooks      |
//! | [`event`]      | `WorkshopEvent`                                              |
//! | [`loader`]     | `load_items_csv`, `load_stations_csv` (+ `_reader` variants) |
//! | [`error`]      | `CraftError`, `CraftResult<T>`                               |
//!
//! # Work loop
//!
//! ```text
//! begin_building_item(I, S)  ──▶ Gather(ingredient) × n
//! Gather complete            ──▶ Deliver(item → destination)
//! Deliver completes recipe   ──▶ Use(S)
//! Use complete               ──▶ output on S; Gather(I) if a sink wants I
//! ```

pub mod error;
pub mod event;
pub mod item;
pub mod launch;
pub mod loader;
pub mod station;
pub mod task;
pub mod taskmaster;
pub mod workshop;

#[cfg(test)]
mod tests;

pub use error::{CraftError, CraftResult};
pub use event::WorkshopEvent;
pub use item::{ItemCatalog, ItemType};
pub use launch::{LaunchPad, LaunchPadParams, LaunchPhase};
pub use loader::{load_items_csv, load_items_reader, load_stations_csv, load_stations_reader};
pub use station::{ActionCircle, FinishStation, Received, Station, StationKind, ToyStation};
pub use task::{CraftContext, Task, TaskKind, TaskTimings, Worker};
pub use taskmaster::{Demand, Taskmaster};
pub use workshop::{TaskOutcome, Workshop};
