use thiserror::Error;
use ws_core::{ItemId, StationId};

#[derive(Debug, Error)]
pub enum CraftError {
    #[error("unknown item {0:?}")]
    UnknownItem(String),

    #[error("item id {0} is not in the catalog")]
    UnknownItemId(ItemId),

    #[error("duplicate item name {0:?}")]
    DuplicateItem(String),

    #[error("station {0} does not exist")]
    UnknownStation(StationId),

    #[error("invalid station: {0}")]
    InvalidStation(String),

    /// The ingredient graph loops back on itself; holds the item names along
    /// the loop, first and last equal.
    #[error("recipe cycle: {}", .0.join(" -> "))]
    RecipeCycle(Vec<String>),

    #[error("content parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CraftResult<T> = Result<T, CraftError>;
