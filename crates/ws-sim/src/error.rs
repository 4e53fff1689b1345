use thiserror::Error;
use ws_agents::AgentError;
use ws_core::WsError;
use ws_craft::CraftError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] WsError),

    #[error("agent setup failed: {0}")]
    Agent(#[from] AgentError),

    #[error("workshop setup failed: {0}")]
    Craft(#[from] CraftError),
}

pub type SimResult<T> = Result<T, SimError>;
