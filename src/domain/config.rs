use serde::{Deserialize, Serialize};

use super::error::WorldError;

/// Grid layout of a world. Immutable once the world is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub columns: u32,
    pub rows: u32,
    /// Edge length of one square cell, in world units.
    pub cell_size: i32,
    /// Added to every computed cell index, so `offset` cells of negative
    /// world space are still addressable.
    pub offset: i32,
}

impl WorldConfig {
    pub const fn new(columns: u32, rows: u32, cell_size: i32, offset: i32) -> Self {
        Self { columns, rows, cell_size, offset }
    }

    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let config: WorldConfig = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejected world config");
            WorldError::from(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.cell_size <= 0 {
            return Err(WorldError::InvalidCellSize(self.cell_size));
        }
        if self.columns == 0 || self.rows == 0 || self.columns > i32::MAX as u32 || self.rows > i32::MAX as u32 {
            return Err(WorldError::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        // Plain struct of integers: serialization can't fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(64, 64, 32, 0)
    }
}
