//! The workshop context: catalog, stations and taskmaster in one place.
//!
//! Task lifecycle hooks run here because they touch several of these at
//! once (a gather reserves supply on one station and demand on another,
//! a delivery may complete a recipe and queue a `Use` task).

use tracing::{info, warn};
use ws_core::{ItemId, StationId};

use crate::station::{ActionCircle, Received, StationKind};
use crate::{
    CraftContext, CraftError, CraftResult, ItemCatalog, Station, Task, TaskKind, TaskTimings, Taskmaster,
    Worker, WorkshopEvent,
};

/// What the assignee should do with its hands after a task completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Carry(ItemId),
    Drop,
    Nothing,
}

pub struct Workshop {
    pub catalog:    ItemCatalog,
    /// Indexed by `StationId`.
    pub stations:   Vec<Station>,
    pub taskmaster: Taskmaster,
    pub timings:    TaskTimings,
}

impl Workshop {
    /// Check station ids and item references, validate recipes, and expand
    /// `requested` into crafting demand.
    pub fn new(catalog: ItemCatalog, stations: Vec<Station>, requested: Vec<ItemId>) -> CraftResult<Self> {
        for (i, s) in stations.iter().enumerate() {
            if s.id.index() != i {
                return Err(CraftError::InvalidStation(format!(
                    "station at index {i} has id {}",
                    s.id
                )));
            }
            if let StationKind::Resource { output } = s.kind {
                if catalog.get(output).is_none() {
                    return Err(CraftError::UnknownItemId(output));
                }
            }
        }
        let taskmaster = Taskmaster::new(&catalog, requested)?;
        Ok(Self { catalog, stations, taskmaster, timings: TaskTimings::default() })
    }

    pub fn with_timings(mut self, timings: TaskTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Switch to conveyor mode, timing the run from `now`.
    pub fn with_conveyor(mut self, items: Vec<ItemId>, now: f32) -> Self {
        self.taskmaster = self.taskmaster.with_conveyor(items);
        for s in &mut self.stations {
            if let StationKind::Conveyor(c) = &mut s.kind {
                c.started_at = now;
            }
        }
        self
    }

    pub fn context(&self) -> CraftContext<'_> {
        CraftContext {
            catalog:  &self.catalog,
            stations: &self.stations,
            demand:   &self.taskmaster.demand,
        }
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id.index())
    }

    // ── Scheduling ────────────────────────────────────────────────────────────

    pub fn try_take_task(&mut self, worker: &Worker) -> Option<Task> {
        self.taskmaster.try_take_task(worker, &self.catalog, &self.stations)
    }

    /// User request: build `item` at `station`.
    pub fn begin_building_item(&mut self, item: ItemId, station: StationId) -> bool {
        let Some(s) = self.stations.get_mut(station.index()) else {
            return false;
        };
        self.taskmaster.begin_building_item(item, s, &self.catalog)
    }

    pub fn can_build_item(&self, item: ItemId) -> bool {
        self.taskmaster.can_build_item(item, &self.catalog)
    }

    pub fn processing_time(&self, task: &Task) -> f32 {
        task.kind.processing_time(&self.timings)
    }

    pub fn target_circle(&self, task: &Task) -> Option<ActionCircle> {
        task.target_circle(&self.stations)
    }

    /// Animation the assignee plays while processing `task`.
    pub fn using_animation(&self, task: &Task) -> Option<&'static str> {
        match task.kind {
            TaskKind::Use => self.station(task.station?)?.using_animation(),
            _ => None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Reserve what the task will consume before the assignee sets off.
    pub fn initialize_task(&mut self, task: &mut Task, worker: &Worker) {
        let Some(sid) = task.station else {
            warn!(task = %task.id, "initializing a task with no station");
            return;
        };
        match task.kind {
            TaskKind::Gather { item, .. } => {
                let Some(source) = self.stations.get_mut(sid.index()) else {
                    return;
                };
                source.prepare_to_take_item();

                let destination = {
                    let ctx = self.context();
                    let rereceive = ctx
                        .station(sid)
                        .is_some_and(|s| s.can_receive_item(item, Some(sid), ctx.catalog, ctx.demand));
                    if rereceive { Some(sid) } else { task.destination_for(worker, &ctx) }
                };
                let Some(dest) = destination else {
                    warn!(task = %task.id, item = self.catalog.name(item), "gather has no destination");
                    return;
                };
                if let Some(d) = self.stations.get_mut(dest.index()) {
                    d.prepare_to_receive_item(item, &mut self.taskmaster.demand);
                }
                task.kind = TaskKind::Gather { item, destination: Some(dest) };
            }
            TaskKind::Deliver { .. } => {}
            TaskKind::Use => {
                if let Some(s) = self.stations.get_mut(sid.index()) {
                    s.prepare_to_use();
                }
            }
        }
    }

    /// The assignee has reached the station.
    pub fn start_task(&mut self, task: &Task) {
        if let (TaskKind::Use, Some(sid)) = (task.kind, task.station) {
            if let Some(s) = self.stations.get_mut(sid.index()) {
                s.begin_use();
            }
        }
    }

    /// Processing time has elapsed: apply the task's effect.
    pub fn complete_task(&mut self, task: &Task, now: f32) -> TaskOutcome {
        let Some(sid) = task.station else {
            warn!(task = %task.id, "completing a task with no station");
            return TaskOutcome::Nothing;
        };

        let outcome = match task.kind {
            TaskKind::Gather { destination, .. } => self.complete_gather(sid, destination),
            TaskKind::Deliver { item } => {
                self.deliver(sid, item, now);
                TaskOutcome::Drop
            }
            TaskKind::Use => {
                let built = self.stations.get_mut(sid.index()).and_then(|s| s.end_use());
                if let Some(item) = built {
                    info!(item = self.catalog.name(item), station = %sid, "item built");
                    self.taskmaster.push_event(WorkshopEvent::ItemBuilt { item, station: sid });
                    self.taskmaster.finish_building_item(item);
                }
                TaskOutcome::Nothing
            }
        };

        if let Some(agent) = task.assignee {
            self.taskmaster.push_event(WorkshopEvent::TaskCompleted { task: task.id, agent });
        }
        outcome
    }

    fn complete_gather(&mut self, source: StationId, destination: Option<StationId>) -> TaskOutcome {
        let Some(dest) = destination else {
            warn!(station = %source, "gather completed without a destination");
            return TaskOutcome::Nothing;
        };
        let Some(item) = self.stations.get_mut(source.index()).and_then(|s| s.take_item()) else {
            warn!(station = %source, "gather source had nothing to take");
            return TaskOutcome::Nothing;
        };
        self.taskmaster.push_event(WorkshopEvent::ItemTaken { item, station: source });
        self.taskmaster.add_task(TaskKind::Deliver { item }, Some(dest));
        TaskOutcome::Carry(item)
    }

    fn deliver(&mut self, sid: StationId, item: ItemId, now: f32) {
        let Some(station) = self.stations.get_mut(sid.index()) else {
            return;
        };
        let received = station.receive_item(item, &self.catalog, now);
        let started_at = match &station.kind {
            StationKind::Conveyor(c) => c.started_at,
            _ => now,
        };
        self.taskmaster.push_event(WorkshopEvent::ItemReceived { item, station: sid });

        match received {
            Received::Stored { ready_to_use: true } => {
                self.taskmaster.add_task(TaskKind::Use, Some(sid));
            }
            Received::Stored { ready_to_use: false } => {}
            Received::Launched => {
                info!(item = self.catalog.name(item), station = %sid, "item launched");
                self.taskmaster.push_event(WorkshopEvent::ItemLaunched { item, station: sid });
            }
            Received::Accepted => {
                info!(item = self.catalog.name(item), "delivered to conveyor");
                if self.taskmaster.demand.conveyor.is_empty() {
                    let elapsed = now - started_at;
                    info!(elapsed, "conveyor finished");
                    self.taskmaster
                        .push_event(WorkshopEvent::ConveyorComplete { station: sid, elapsed });
                }
            }
            Received::Refused => {
                warn!(item = self.catalog.name(item), station = %sid, "station refused a delivery");
            }
        }
    }

    // ── Per-tick ──────────────────────────────────────────────────────────────

    /// Step launch pads on finish stations.
    pub fn update(&mut self, now: f32, dt: f32) {
        for s in &mut self.stations {
            if let StationKind::Finish(f) = &mut s.kind {
                f.update(now, dt);
            }
        }
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, WorkshopEvent> {
        self.taskmaster.drain_events()
    }
}
