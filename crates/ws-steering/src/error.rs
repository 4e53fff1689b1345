use thiserror::Error;

#[derive(Debug, Error)]
pub enum SteeringError {
    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("invalid steering parameters: {0}")]
    InvalidParams(String),
}

pub type SteeringResult<T> = Result<T, SteeringError>;
