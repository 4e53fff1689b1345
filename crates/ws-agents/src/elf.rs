//! The elf: a worker that pulls tasks from the taskmaster and walks them out.
//!
//! ```text
//!            task taken                 reached circle               processing_time
//! WaitingForTask ──────▶ WalkingToTask ───────────────▶ ProcessingTask ──────────────▶ WaitingForTask
//! ```
//!
//! A finished task immediately tries to take the next one, so a busy elf can
//! go from processing straight back to walking within one tick.

use tracing::{debug, warn};
use ws_core::{AgentId, AgentRng, ItemId, Vec3};
use ws_craft::{ActionCircle, Task, TaskKind, TaskOutcome, Worker};
use ws_steering::{KinematicBody, Steering, SteeringParams};

use crate::{AgentEvent, DecideContext, ElfConfig, SteerContext};

/// Below this squared distance the elf does not turn toward the station.
const FACE_STATION_SQ: f32 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElfState {
    WaitingForTask,
    WalkingToTask,
    ProcessingTask,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Elf {
    pub config:      ElfConfig,
    pub state:       ElfState,
    /// Sim time the current state was entered.
    pub state_start: f32,
    pub task:        Option<Task>,
    /// Action circle of the current task.
    pub target:      Option<ActionCircle>,
    pub carrying:    Option<ItemId>,
    /// Using animation currently raised, if any.
    pub animation:   Option<&'static str>,
}

impl Elf {
    pub fn new(config: ElfConfig) -> Self {
        Self {
            config,
            state:       ElfState::WaitingForTask,
            state_start: 0.0,
            task:        None,
            target:      None,
            carrying:    None,
            animation:   None,
        }
    }

    /// Speed cap for the current state.
    pub fn speed_cap(&self) -> f32 {
        match self.state {
            ElfState::WaitingForTask => self.config.speed_wandering,
            _ if self.carrying.is_some() => self.config.speed_carrying,
            _ => self.config.speed_walking,
        }
    }

    pub fn worker(&self, id: AgentId, body: &KinematicBody) -> Worker {
        Worker { id, position: body.position, carrying: self.carrying }
    }

    // ── Decision phase ────────────────────────────────────────────────────────

    pub fn decide(&mut self, id: AgentId, body: &mut KinematicBody, ctx: &mut DecideContext<'_>) {
        match self.state {
            ElfState::WaitingForTask => self.take_new_task(id, body, ctx),
            ElfState::WalkingToTask => {
                let Some(circle) = self.target else {
                    warn!(agent = %id, "walking without a target circle");
                    self.abandon_task(id, ctx);
                    return;
                };
                let reach = circle.radius + body.radius;
                if body.position.distance_squared(circle.center) <= reach * reach {
                    self.start_task(id, ctx);
                }
            }
            ElfState::ProcessingTask => {
                let Some(task) = &self.task else {
                    warn!(agent = %id, "processing without a task");
                    self.set_state(ElfState::WaitingForTask, id, ctx);
                    return;
                };
                if let Some(station) = task.station.and_then(|s| ctx.workshop.station(s)) {
                    let to_station = station.position - body.position;
                    if to_station.length_squared() > FACE_STATION_SQ {
                        body.set_direction(to_station);
                    }
                }
                if ctx.now - self.state_start >= ctx.workshop.processing_time(task) {
                    self.finish_task(id, body, ctx);
                }
            }
        }
    }

    fn take_new_task(&mut self, id: AgentId, body: &KinematicBody, ctx: &mut DecideContext<'_>) {
        let worker = self.worker(id, body);
        let Some(mut task) = ctx.workshop.try_take_task(&worker) else {
            return;
        };
        ctx.workshop.initialize_task(&mut task, &worker);
        self.target = ctx.workshop.target_circle(&task);
        debug!(agent = %id, task = %task.id, kind = ?task.kind, "task taken");
        self.task = Some(task);
        self.set_state(ElfState::WalkingToTask, id, ctx);
    }

    fn start_task(&mut self, id: AgentId, ctx: &mut DecideContext<'_>) {
        let Some(task) = &self.task else {
            return;
        };
        ctx.workshop.start_task(task);
        if task.kind == TaskKind::Use {
            if let Some(name) = ctx.workshop.using_animation(task) {
                self.animation = Some(name);
                ctx.emit(AgentEvent::AnimationSet { agent: id, name });
            }
        }
        self.set_state(ElfState::ProcessingTask, id, ctx);
    }

    fn finish_task(&mut self, id: AgentId, body: &KinematicBody, ctx: &mut DecideContext<'_>) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Some(name) = self.animation.take() {
            ctx.emit(AgentEvent::AnimationCleared { agent: id, name });
        }
        match ctx.workshop.complete_task(&task, ctx.now) {
            TaskOutcome::Carry(item) => self.carry_item(id, item, ctx),
            TaskOutcome::Drop => self.drop_item(id, ctx),
            TaskOutcome::Nothing => {}
        }
        debug!(agent = %id, task = %task.id, "task completed");
        self.target = None;
        self.set_state(ElfState::WaitingForTask, id, ctx);
        self.take_new_task(id, body, ctx);
    }

    fn abandon_task(&mut self, id: AgentId, ctx: &mut DecideContext<'_>) {
        self.task = None;
        self.target = None;
        self.set_state(ElfState::WaitingForTask, id, ctx);
    }

    pub fn carry_item(&mut self, id: AgentId, item: ItemId, ctx: &mut DecideContext<'_>) {
        self.carrying = Some(item);
        ctx.emit(AgentEvent::CarryAttached { agent: id, item });
    }

    pub fn drop_item(&mut self, id: AgentId, ctx: &mut DecideContext<'_>) {
        if let Some(item) = self.carrying.take() {
            ctx.emit(AgentEvent::CarryDetached { agent: id, item });
        }
    }

    fn set_state(&mut self, next: ElfState, id: AgentId, ctx: &mut DecideContext<'_>) {
        if self.state != next {
            ctx.emit(AgentEvent::ElfStateChanged { agent: id, from: self.state, to: next });
        }
        self.state = next;
        self.state_start = ctx.now;
    }

    // ── Steering phase ────────────────────────────────────────────────────────

    /// Clamped steering force for this tick.
    pub fn steer(
        &self,
        body:   &KinematicBody,
        base:   &SteeringParams,
        angle:  &mut f32,
        rng:    &mut AgentRng,
        ctx:    &SteerContext<'_>,
    ) -> Vec3 {
        let params = SteeringParams { max_speed: self.speed_cap(), ..base.clone() };
        let mut s = Steering::new(body, &params);

        match self.state {
            ElfState::WaitingForTask => {
                s.wander(angle, rng, ctx.dt, 1.0);
                s.avoid_all_obstacles(ctx.obstacles.obstacles(), 2.0);
                s.separate_predictive(ctx.bodies, body.direction, 5.0);
            }
            ElfState::WalkingToTask => {
                if let Some(circle) = self.target {
                    let reach = circle.radius + body.radius;
                    let seek_dir = (circle.center - body.position).normalized();
                    s.separate_predictive(ctx.bodies, seek_dir, 4.0);
                    if body.position.distance_squared(circle.center) > reach * reach {
                        s.avoid_all_obstacles_and_seek(circle.center - seek_dir * reach, ctx.obstacles.obstacles(), 1.0);
                    }
                }
            }
            ElfState::ProcessingTask => {}
        }

        s.stay_in_bounds(ctx.elf_extents.min(), ctx.elf_extents.max(), 1.0);
        s.finish()
    }
}
