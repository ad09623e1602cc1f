#[cfg(feature = "cli")]
pub mod cli;
pub mod season_file;
pub mod settings;

pub use season_file::SeasonFile;
pub use settings::EngineSettings;
