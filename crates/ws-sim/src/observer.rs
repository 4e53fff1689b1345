//! Simulation observer trait for presentation and data collection.

use ws_core::{SimClock, Tick};

use crate::SimEvent;

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Rendering, animation, audio and UI
/// hang off these hooks; the simulation never waits on them.
///
/// # Example: launch counter
///
/// ```rust,ignore
/// struct Launches(usize);
///
/// impl SimObserver for Launches {
///     fn on_event(&mut self, _tick: Tick, event: &SimEvent) {
///         if let SimEvent::Workshop(WorkshopEvent::ItemLaunched { .. }) = event {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event produced during the tick.  World-phase events
    /// come first; decision-phase agent events (ascending id) precede that
    /// phase's workshop events.
    fn on_event(&mut self, _tick: Tick, _event: &SimEvent) {}

    /// Called at the end of each tick with the advanced clock.
    fn on_tick_end(&mut self, _tick: Tick, _clock: &SimClock) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
