//! Stations: fixed world locations that supply, accept, or transform items.
//!
//! # Capabilities
//!
//! | Kind       | take       | receive                         | use             |
//! |------------|------------|---------------------------------|-----------------|
//! | `Resource` | always     | never                           | never           |
//! | `Toy`      | its output | remaining recipe ingredients    | recipe complete |
//! | `Finish`   | never      | outstanding requested items     | never           |
//! | `Conveyor` | never      | outstanding conveyor items      | never           |
//!
//! Station state changes only through the task lifecycle (reserve, take,
//! receive, use).  Follow-up work such as a `Use` task after the last
//! ingredient arrives is reported back through [`Received`] and scheduled by
//! the workshop.

use ws_core::{ItemId, StationId, Vec3};

use crate::launch::{LaunchPad, LaunchPadParams};
use crate::{Demand, ItemCatalog};

/// A circle an elf must enter to work on a task.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCircle {
    pub center: Vec3,
    pub radius: f32,
}

/// What happened when an item was handed to a station.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Received {
    /// Added to a toy station's inputs; `ready_to_use` when the recipe is
    /// now complete.
    Stored { ready_to_use: bool },
    /// Sent off on a launch pad.
    Launched,
    /// Counted by a conveyor.
    Accepted,
    /// The station never takes items.
    Refused,
}

/// Crafting state of a toy station.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToyStation {
    /// Item currently being assembled.
    pub pending:    Option<ItemId>,
    /// Ingredients delivered so far.
    pub inputs:     Vec<ItemId>,
    /// Ingredients promised by in-flight gather tasks.
    pub in_transit: Vec<ItemId>,
    /// Finished item awaiting pickup.
    pub output:     Option<ItemId>,
    pub output_being_taken: bool,
}

impl ToyStation {
    /// Recipe ingredients still neither delivered nor reserved (multiset).
    pub fn remaining(&self, catalog: &ItemCatalog) -> Vec<ItemId> {
        let Some(pending) = self.pending else {
            return Vec::new();
        };
        let mut left = catalog.ingredients(pending).to_vec();
        for used in self.inputs.iter().chain(&self.in_transit) {
            if let Some(pos) = left.iter().position(|i| i == used) {
                left.swap_remove(pos);
            }
        }
        left
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinishStation {
    pub params:      LaunchPadParams,
    /// Pads currently in flight.
    pub pads:        Vec<LaunchPad>,
    /// An empty pad is waiting for the next item.
    pub idle_pad:    bool,
    pub last_launch: Option<f32>,
}

impl FinishStation {
    pub fn new(params: LaunchPadParams) -> Self {
        Self { params, pads: Vec::new(), idle_pad: true, last_launch: None }
    }

    /// Step pads in flight, drop despawned ones, and restore the idle pad
    /// once the replacement delay has passed.
    pub fn update(&mut self, now: f32, dt: f32) {
        let params = &self.params;
        self.pads.retain_mut(|pad| !pad.update(now, dt, params));
        if !self.idle_pad && self.last_launch.is_none_or(|t| now - t >= self.params.seconds_to_replace) {
            self.idle_pad = true;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConveyorStation {
    /// Sim time the conveyor run started.
    pub started_at: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StationKind {
    Resource { output: ItemId },
    Toy(ToyStation),
    Finish(FinishStation),
    Conveyor(ConveyorStation),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id:          StationId,
    pub position:    Vec3,
    /// Where items are dropped off and picked up.
    pub item_circle: ActionCircle,
    /// Where an elf stands to work the station.
    pub use_circle:  ActionCircle,
    pub occupied:    bool,
    pub kind:        StationKind,
}

impl Station {
    /// A station with both action circles centered on `position`, radius 1.
    pub fn new(id: StationId, position: Vec3, kind: StationKind) -> Self {
        let circle = ActionCircle { center: position, radius: 1.0 };
        Self {
            id,
            position,
            item_circle: circle,
            use_circle: circle,
            occupied: false,
            kind,
        }
    }

    pub fn resource(id: StationId, position: Vec3, output: ItemId) -> Self {
        Self::new(id, position, StationKind::Resource { output })
    }

    pub fn toy(id: StationId, position: Vec3) -> Self {
        Self::new(id, position, StationKind::Toy(ToyStation::default()))
    }

    pub fn finish(id: StationId, position: Vec3) -> Self {
        Self::new(id, position, StationKind::Finish(FinishStation::new(LaunchPadParams::default())))
    }

    pub fn conveyor(id: StationId, position: Vec3) -> Self {
        Self::new(id, position, StationKind::Conveyor(ConveyorStation::default()))
    }

    pub fn with_item_circle(mut self, center: Vec3, radius: f32) -> Self {
        self.item_circle = ActionCircle { center, radius };
        self
    }

    pub fn with_use_circle(mut self, center: Vec3, radius: f32) -> Self {
        self.use_circle = ActionCircle { center, radius };
        self
    }

    pub fn toy_state(&self) -> Option<&ToyStation> {
        match &self.kind {
            StationKind::Toy(t) => Some(t),
            _ => None,
        }
    }

    // ── Supply ────────────────────────────────────────────────────────────────

    pub fn output_item(&self) -> Option<ItemId> {
        match &self.kind {
            StationKind::Resource { output } => Some(*output),
            StationKind::Toy(t) => t.output,
            StationKind::Finish(_) | StationKind::Conveyor(_) => None,
        }
    }

    pub fn can_take_item(&self) -> bool {
        match &self.kind {
            StationKind::Resource { .. } => true,
            StationKind::Toy(t) => t.output.is_some() && !t.output_being_taken,
            StationKind::Finish(_) | StationKind::Conveyor(_) => false,
        }
    }

    /// Reserve the output for one gatherer.
    pub fn prepare_to_take_item(&mut self) {
        if let StationKind::Toy(t) = &mut self.kind {
            t.output_being_taken = true;
        }
    }

    pub fn take_item(&mut self) -> Option<ItemId> {
        match &mut self.kind {
            StationKind::Resource { output } => Some(*output),
            StationKind::Toy(t) => {
                t.output_being_taken = false;
                t.output.take()
            }
            StationKind::Finish(_) | StationKind::Conveyor(_) => None,
        }
    }

    // ── Demand ────────────────────────────────────────────────────────────────

    /// Whether the station will accept one more `item`.  `source` is the
    /// station the item comes from, if known; a toy station holding an
    /// output only accepts items that come from itself.
    pub fn can_receive_item(
        &self,
        item:    ItemId,
        source:  Option<StationId>,
        catalog: &ItemCatalog,
        demand:  &Demand,
    ) -> bool {
        match &self.kind {
            StationKind::Resource { .. } => false,
            StationKind::Toy(t) => {
                if self.occupied || t.pending.is_none() {
                    return false;
                }
                if t.output.is_some() && source != Some(self.id) {
                    return false;
                }
                t.remaining(catalog).contains(&item)
            }
            StationKind::Finish(_) => demand.requested.contains(&item),
            StationKind::Conveyor(_) => demand.conveyor.contains(&item),
        }
    }

    /// Reserve capacity for an incoming `item`.
    pub fn prepare_to_receive_item(&mut self, item: ItemId, demand: &mut Demand) {
        match &mut self.kind {
            StationKind::Resource { .. } => {}
            StationKind::Toy(t) => t.in_transit.push(item),
            StationKind::Finish(_) => {
                Demand::remove_one(&mut demand.requested, item);
            }
            StationKind::Conveyor(_) => {
                Demand::remove_one(&mut demand.conveyor, item);
            }
        }
    }

    pub fn receive_item(&mut self, item: ItemId, catalog: &ItemCatalog, now: f32) -> Received {
        let occupied = self.occupied;
        match &mut self.kind {
            StationKind::Resource { .. } => Received::Refused,
            StationKind::Toy(t) => {
                if let Some(pos) = t.in_transit.iter().position(|&i| i == item) {
                    t.in_transit.swap_remove(pos);
                }
                t.inputs.push(item);
                Received::Stored { ready_to_use: toy_ready(t, occupied, catalog) }
            }
            StationKind::Finish(f) => {
                f.idle_pad = false;
                f.pads.push(LaunchPad::launch(item, now));
                f.last_launch = Some(now);
                Received::Launched
            }
            StationKind::Conveyor(_) => Received::Accepted,
        }
    }

    // ── Use ───────────────────────────────────────────────────────────────────

    pub fn can_use(&self, catalog: &ItemCatalog) -> bool {
        match &self.kind {
            StationKind::Toy(t) => toy_ready(t, self.occupied, catalog),
            _ => false,
        }
    }

    pub fn prepare_to_use(&mut self) {}

    pub fn begin_use(&mut self) {
        if let StationKind::Toy(_) = self.kind {
            self.occupied = true;
        }
    }

    /// Finish the build: inputs are consumed and the pending item becomes
    /// the output.  Returns the built item.
    pub fn end_use(&mut self) -> Option<ItemId> {
        let StationKind::Toy(t) = &mut self.kind else {
            return None;
        };
        self.occupied = false;
        t.inputs.clear();
        let built = t.pending.take();
        if built.is_some() {
            t.output = built;
        }
        built
    }

    /// Animation an elf plays while using this station.
    pub fn using_animation(&self) -> Option<&'static str> {
        match self.kind {
            StationKind::Toy(_) => Some("Hammering"),
            _ => None,
        }
    }

    // ── User builds ───────────────────────────────────────────────────────────

    /// A toy station accepts a new build when idle and any finished output
    /// it still holds is an ingredient of the new item.
    pub fn can_accept_user_item(&self, item: ItemId, catalog: &ItemCatalog) -> bool {
        match &self.kind {
            StationKind::Toy(t) => {
                t.pending.is_none()
                    && !self.occupied
                    && t.output.is_none_or(|o| catalog.is_ingredient_of(o, item))
            }
            _ => false,
        }
    }

    pub fn accept_user_item(&mut self, item: ItemId) {
        if let StationKind::Toy(t) = &mut self.kind {
            t.pending = Some(item);
        }
    }
}

fn toy_ready(t: &ToyStation, occupied: bool, catalog: &ItemCatalog) -> bool {
    !occupied && t.pending.is_some_and(|p| t.inputs.len() == catalog.ingredients(p).len())
}
