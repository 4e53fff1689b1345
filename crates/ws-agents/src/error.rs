use thiserror::Error;
use ws_steering::SteeringError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent configuration error: {0}")]
    Config(String),

    #[error("could not place snowman {index} outside the elf region after {attempts} attempts")]
    Spawn { index: usize, attempts: u32 },

    #[error(transparent)]
    Steering(#[from] SteeringError),
}

pub type AgentResult<T> = Result<T, AgentError>;
