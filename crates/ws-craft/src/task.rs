//! Tasks: atomic units of elf work bound to a station.
//!
//! | Kind      | Priority | Circle | Time | Created by                               |
//! |-----------|----------|--------|------|------------------------------------------|
//! | `Gather`  | 0        | item   | 1 s  | a build request or a finished root item  |
//! | `Deliver` | 1        | item   | 1 s  | a completed gather                       |
//! | `Use`     | 2        | use    | 6 s  | a toy station whose recipe is complete   |
//!
//! A gather task has no station until it is assigned; its source is the
//! nearest station that can give the item, and its destination is fixed
//! when the task is initialized.

use ws_core::{AgentId, ItemId, StationId, TaskId, Vec3};

use crate::station::ActionCircle;
use crate::{Demand, ItemCatalog, Station};

/// Processing time per task kind, in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskTimings {
    pub gather:  f32,
    pub deliver: f32,
    pub use_:    f32,
}

impl Default for TaskTimings {
    fn default() -> Self {
        Self { gather: 1.0, deliver: 1.0, use_: 6.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskKind {
    Gather { item: ItemId, destination: Option<StationId> },
    Deliver { item: ItemId },
    Use,
}

impl TaskKind {
    pub fn gather(item: ItemId) -> Self {
        TaskKind::Gather { item, destination: None }
    }

    /// Static tie-break priority; higher wins exact distance ties.
    pub fn priority(&self) -> u8 {
        match self {
            TaskKind::Gather { .. } => 0,
            TaskKind::Deliver { .. } => 1,
            TaskKind::Use => 2,
        }
    }

    pub fn processing_time(&self, timings: &TaskTimings) -> f32 {
        match self {
            TaskKind::Gather { .. } => timings.gather,
            TaskKind::Deliver { .. } => timings.deliver,
            TaskKind::Use => timings.use_,
        }
    }

    pub fn item(&self) -> Option<ItemId> {
        match self {
            TaskKind::Gather { item, .. } | TaskKind::Deliver { item } => Some(*item),
            TaskKind::Use => None,
        }
    }

    /// The circle of `station` this kind of task is performed in.
    pub fn circle(&self, station: &Station) -> ActionCircle {
        match self {
            TaskKind::Gather { .. } | TaskKind::Deliver { .. } => station.item_circle,
            TaskKind::Use => station.use_circle,
        }
    }
}

/// The elf-side view a task needs to decide eligibility.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Worker {
    pub id:       AgentId,
    pub position: Vec3,
    pub carrying: Option<ItemId>,
}

/// Read-only workshop state tasks are evaluated against.
#[derive(Copy, Clone)]
pub struct CraftContext<'a> {
    pub catalog:  &'a ItemCatalog,
    pub stations: &'a [Station],
    pub demand:   &'a Demand,
}

impl<'a> CraftContext<'a> {
    pub fn station(&self, id: StationId) -> Option<&'a Station> {
        self.stations.get(id.index())
    }

    /// Nearest station (by `kind`'s action circle) satisfying `pred`.
    fn nearest(&self, kind: &TaskKind, from: Vec3, pred: impl Fn(&Station) -> bool) -> Option<StationId> {
        let mut best: Option<(f32, StationId)> = None;
        for s in self.stations.iter().filter(|s| pred(s)) {
            let d = kind.circle(s).center.distance_squared(from);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, s.id));
            }
        }
        best.map(|(_, id)| id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id:       TaskId,
    pub kind:     TaskKind,
    pub station:  Option<StationId>,
    pub assignee: Option<AgentId>,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind, station: Option<StationId>) -> Self {
        Self { id, kind, station, assignee: None }
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.kind.priority()
    }

    /// The station this task would send `worker` to.
    pub fn source_for(&self, worker: &Worker, ctx: &CraftContext<'_>) -> Option<StationId> {
        match self.kind {
            TaskKind::Gather { item, .. } if self.station.is_none() => ctx.nearest(&self.kind, worker.position, |s| {
                s.can_take_item() && s.output_item() == Some(item)
            }),
            _ => self.station,
        }
    }

    /// Nearest station that will accept the task's item from another
    /// station.
    pub fn destination_for(&self, worker: &Worker, ctx: &CraftContext<'_>) -> Option<StationId> {
        let item = self.kind.item()?;
        ctx.nearest(&self.kind, worker.position, |s| {
            s.can_receive_item(item, None, ctx.catalog, ctx.demand)
        })
    }

    pub fn can_take(&self, worker: &Worker, ctx: &CraftContext<'_>) -> bool {
        match self.kind {
            TaskKind::Gather { item, .. } => {
                if worker.carrying.is_some() {
                    return false;
                }
                let Some(source) = self.source_for(worker, ctx).and_then(|id| ctx.station(id)) else {
                    return false;
                };
                source.can_receive_item(item, Some(source.id), ctx.catalog, ctx.demand)
                    || self.destination_for(worker, ctx).is_some()
            }
            TaskKind::Deliver { item } => worker.carrying == Some(item) && self.station.is_some(),
            TaskKind::Use => self
                .station
                .and_then(|id| ctx.station(id))
                .is_some_and(|s| s.can_use(ctx.catalog)),
        }
    }

    /// Bind `worker` and resolve the station if the task has none yet.
    pub fn attempt_to_assign(&mut self, worker: &Worker, ctx: &CraftContext<'_>) -> bool {
        if !self.can_take(worker, ctx) {
            return false;
        }
        self.assignee = Some(worker.id);
        if self.station.is_none() {
            self.station = self.source_for(worker, ctx);
        }
        true
    }

    /// Action circle the assignee must enter.
    pub fn target_circle(&self, stations: &[Station]) -> Option<ActionCircle> {
        let station = stations.get(self.station?.index())?;
        Some(self.kind.circle(station))
    }
}
