//! The single event stream observers see.

use ws_agents::AgentEvent;
use ws_craft::WorkshopEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Workshop(WorkshopEvent),
    Agent(AgentEvent),
}

impl From<WorkshopEvent> for SimEvent {
    fn from(e: WorkshopEvent) -> Self {
        SimEvent::Workshop(e)
    }
}

impl From<AgentEvent> for SimEvent {
    fn from(e: AgentEvent) -> Self {
        SimEvent::Agent(e)
    }
}
