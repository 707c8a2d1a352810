//! Error types for world construction and handle lookups.

use super::handle::BodyHandle;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WorldError {
    /// Cells must have a positive edge length.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),

    /// The grid needs at least one column and one row.
    #[error("invalid grid dimensions: {columns}x{rows}")]
    InvalidDimensions { columns: u32, rows: u32 },

    /// The JSON configuration could not be parsed.
    #[error("invalid world config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Handle is stale or belongs to another world.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),

    #[error("unknown resolver {0:?}, expected \"impulse\" or \"retro\"")]
    UnknownResolver(String),
}
