//! Workspace error type.
//!
//! Sub-crates define their own error enums and wrap `WsError` as one variant
//! via `#[from]`, so configuration problems found in `ws-core` types surface
//! unchanged at the simulation builder.

use thiserror::Error;

/// The top-level error type for `ws-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum WsError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ws-core`.
pub type WsResult<T> = Result<T, WsError>;
