use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_GRID_SIZE: u32 = 20;
pub const DEFAULT_TEAM_CAR_QUOTA: usize = 2;

/// Tunables of the integrity engine, read from the `[engine]` table of a season file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Highest finishing position a result may carry.
    pub max_grid_size: u32,
    pub team_car_quota: usize,
    /// Lets `finalize` lock races that have no result at all.
    pub allow_empty_finalize: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_grid_size: DEFAULT_MAX_GRID_SIZE,
            team_car_quota: DEFAULT_TEAM_CAR_QUOTA,
            allow_empty_finalize: false,
        }
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<()> {
        validate_range("engine.max_grid_size", self.max_grid_size, 1, 99)?;
        validate_positive_number("engine.team_car_quota", self.team_car_quota, 1)?;
        Ok(())
    }
}
