//! The taskmaster: unassigned task pool and crafting demand bookkeeping.
//!
//! # Assignment
//!
//! [`Taskmaster::try_take_task`] is a greedy, single-elf scan: among tasks
//! the elf can take, pick the one whose station circle is nearest, breaking
//! approximately equal distances by higher priority.  The winner is removed
//! from the pool before it is returned, so a task is never handed out twice.
//! There is no aging: a task whose station is always farther than competing
//! work can wait indefinitely.
//!
//! # Demand
//!
//! At construction the requested root items are expanded depth first over
//! the recipe graph into `items_to_craft`, a multiset of every reachable
//! item (roots and raw materials included, shared sub-ingredients once per
//! use).  A build may start only while the outstanding count of an item
//! exceeds the builds already under way.

use tracing::{debug, info};
use ws_core::{ItemId, StationId, TaskId, approximately};

use crate::{
    CraftContext, CraftError, CraftResult, ItemCatalog, Station, Task, TaskKind, Worker, WorkshopEvent,
};

/// Items still wanted by sinks: finish stations consume `requested`,
/// conveyor stations consume `conveyor`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Demand {
    pub requested: Vec<ItemId>,
    pub conveyor:  Vec<ItemId>,
}

impl Demand {
    /// Remove one occurrence of `item`; `false` if absent.
    pub fn remove_one(list: &mut Vec<ItemId>, item: ItemId) -> bool {
        match list.iter().position(|&i| i == item) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// `true` if some sink still expects `item`.
    pub fn wants(&self, item: ItemId) -> bool {
        self.requested.contains(&item) || self.conveyor.contains(&item)
    }
}

pub struct Taskmaster {
    tasks:          Vec<Task>,
    next_task:      u32,
    pub demand:     Demand,
    /// Outstanding units per item (indexed by `ItemId`).
    items_to_craft: Vec<u32>,
    /// Builds started but not finished, per item.
    in_progress:    Vec<u32>,
    /// Distinct reachable items in discovery order.
    closure:        Vec<ItemId>,
    events:         Vec<WorkshopEvent>,
}

impl Taskmaster {
    /// Validate the recipe graph and expand `requested` into crafting demand.
    pub fn new(catalog: &ItemCatalog, requested: Vec<ItemId>) -> CraftResult<Self> {
        catalog.validate()?;
        if let Some(&bad) = requested.iter().find(|i| catalog.get(**i).is_none()) {
            return Err(CraftError::UnknownItemId(bad));
        }

        let mut items_to_craft = vec![0u32; catalog.len()];
        let mut closure = Vec::new();
        for item in catalog.expand(&requested) {
            if items_to_craft[item.index()] == 0 {
                closure.push(item);
            }
            items_to_craft[item.index()] += 1;
        }
        debug!(roots = requested.len(), distinct = closure.len(), "crafting demand expanded");

        Ok(Self {
            tasks: Vec::new(),
            next_task: 0,
            in_progress: vec![0; catalog.len()],
            items_to_craft,
            events: vec![WorkshopEvent::CraftingTreeReady { requested: requested.clone() }],
            demand: Demand { requested, conveyor: Vec::new() },
            closure,
        })
    }

    /// Conveyor mode: `items` must each be delivered to a conveyor station.
    /// One gather task per item is queued immediately.
    pub fn with_conveyor(mut self, items: Vec<ItemId>) -> Self {
        for &item in &items {
            self.add_task(TaskKind::gather(item), None);
        }
        self.demand.conveyor = items;
        self
    }

    // ── Pool ──────────────────────────────────────────────────────────────────

    pub fn add_task(&mut self, kind: TaskKind, station: Option<StationId>) -> TaskId {
        let id = TaskId(self.next_task);
        self.next_task += 1;
        self.tasks.push(Task::new(id, kind, station));
        self.events.push(WorkshopEvent::TaskAdded { task: id, kind, station });
        id
    }

    /// Unassigned tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Pop and assign the best task for `worker`, if any is eligible.
    pub fn try_take_task(&mut self, worker: &Worker, catalog: &ItemCatalog, stations: &[Station]) -> Option<Task> {
        let idx = {
            let ctx = CraftContext { catalog, stations, demand: &self.demand };
            let mut best: Option<(usize, f32, u8)> = None;
            for (i, task) in self.tasks.iter().enumerate() {
                if !task.can_take(worker, &ctx) {
                    continue;
                }
                let Some(source) = task.source_for(worker, &ctx).and_then(|id| ctx.station(id)) else {
                    continue;
                };
                let d = task.kind.circle(source).center.distance_squared(worker.position);
                let p = task.priority();
                let better = match best {
                    None => true,
                    Some((_, bd, bp)) => d < bd || (approximately(d, bd) && p > bp),
                };
                if better {
                    best = Some((i, d, p));
                }
            }
            best?.0
        };

        let mut task = self.tasks.remove(idx);
        let ctx = CraftContext { catalog, stations, demand: &self.demand };
        if !task.attempt_to_assign(worker, &ctx) {
            self.tasks.insert(idx, task);
            return None;
        }
        debug!(task = %task.id, agent = %worker.id, kind = ?task.kind, "task assigned");
        self.events.push(WorkshopEvent::TaskAssigned {
            task:    task.id,
            agent:   worker.id,
            station: task.station,
        });
        Some(task)
    }

    // ── Crafting demand ───────────────────────────────────────────────────────

    /// Distinct items reachable from the requested roots.
    pub fn closure(&self) -> &[ItemId] {
        &self.closure
    }

    pub fn items_to_craft(&self, item: ItemId) -> u32 {
        self.items_to_craft.get(item.index()).copied().unwrap_or(0)
    }

    pub fn in_progress(&self, item: ItemId) -> u32 {
        self.in_progress.get(item.index()).copied().unwrap_or(0)
    }

    /// A craftable item with more outstanding units than builds under way.
    pub fn can_build_item(&self, item: ItemId, catalog: &ItemCatalog) -> bool {
        catalog.is_craftable(item) && self.items_to_craft(item) > self.in_progress(item)
    }

    pub fn buildable_items(&self, catalog: &ItemCatalog) -> Vec<ItemId> {
        self.closure
            .iter()
            .copied()
            .filter(|&i| self.can_build_item(i, catalog))
            .collect()
    }

    /// Start building `item` at `station`: set the station's pending build
    /// and queue one gather task per ingredient unit.
    pub fn begin_building_item(&mut self, item: ItemId, station: &mut Station, catalog: &ItemCatalog) -> bool {
        if !self.can_build_item(item, catalog) || !station.can_accept_user_item(item, catalog) {
            return false;
        }
        station.accept_user_item(item);
        self.in_progress[item.index()] += 1;

        for &ing in catalog.ingredients(item) {
            self.add_task(TaskKind::gather(ing), None);
        }
        // Nothing to gather: the station is ready straight away.
        if station.can_use(catalog) {
            self.add_task(TaskKind::Use, Some(station.id));
        }

        info!(item = catalog.name(item), station = %station.id, "build started");
        self.events.push(WorkshopEvent::BuildStarted { item, station: station.id });
        self.events.push(WorkshopEvent::BuildableSetChanged);
        true
    }

    /// Book one finished `item`.  If a sink still wants it, queue a gather
    /// task to route it there.
    pub fn finish_building_item(&mut self, item: ItemId) {
        if let Some(n) = self.items_to_craft.get_mut(item.index()) {
            *n = n.saturating_sub(1);
        }
        if let Some(n) = self.in_progress.get_mut(item.index()) {
            *n = n.saturating_sub(1);
        }
        if self.demand.wants(item) {
            self.add_task(TaskKind::gather(item), None);
        }
        self.events.push(WorkshopEvent::BuildableSetChanged);
    }

    // ── Events ────────────────────────────────────────────────────────────────

    pub fn push_event(&mut self, event: WorkshopEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, WorkshopEvent> {
        self.events.drain(..)
    }
}
