//! Events the workshop reports to observers.

use ws_core::{AgentId, ItemId, StationId, TaskId};

use crate::TaskKind;

#[derive(Clone, Debug, PartialEq)]
pub enum WorkshopEvent {
    /// Emitted once at startup so a front end can lay out the crafting tree.
    CraftingTreeReady { requested: Vec<ItemId> },
    TaskAdded { task: TaskId, kind: TaskKind, station: Option<StationId> },
    TaskAssigned { task: TaskId, agent: AgentId, station: Option<StationId> },
    TaskCompleted { task: TaskId, agent: AgentId },
    /// An item left a station in an elf's hands.
    ItemTaken { item: ItemId, station: StationId },
    /// An item was handed to a station.
    ItemReceived { item: ItemId, station: StationId },
    BuildStarted { item: ItemId, station: StationId },
    ItemBuilt { item: ItemId, station: StationId },
    ItemLaunched { item: ItemId, station: StationId },
    /// The answer of `can_build_item` may have changed for some item.
    BuildableSetChanged,
    /// The last conveyor item arrived.
    ConveyorComplete { station: StationId, elapsed: f32 },
}
