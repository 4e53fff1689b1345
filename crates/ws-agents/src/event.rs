//! Presentation-facing agent events.

use ws_core::{AgentId, ItemId, ObstacleId, Vec3};

use crate::{ElfState, SnowmanState};

#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    ElfStateChanged { agent: AgentId, from: ElfState, to: ElfState },
    SnowmanStateChanged { agent: AgentId, from: SnowmanState, to: SnowmanState },
    /// A station's using animation started playing on the elf.
    AnimationSet { agent: AgentId, name: &'static str },
    AnimationCleared { agent: AgentId, name: &'static str },
    /// The elf now visibly holds `item`.
    CarryAttached { agent: AgentId, item: ItemId },
    CarryDetached { agent: AgentId, item: ItemId },
    SnowballThrown { agent: AgentId, from: Vec3, target: Vec3 },
    ObstacleSpawned { obstacle: ObstacleId, position: Vec3, thrower: AgentId },
    ObstacleMelted { obstacle: ObstacleId },
}
