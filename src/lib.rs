pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{EngineSettings, SeasonFile};
pub use core::races::{Award, FinalizePolicy};
pub use core::season::{PointsDiscrepancy, Season};
pub use core::shared::SharedSeason;
pub use utils::error::{ChampionshipError, Result};
