use crate::app::render::{OutputFormat, Report};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "paddock")]
#[command(about = "Load a championship season and print its standings")]
pub struct CliConfig {
    /// Path to the TOML season file
    #[arg(short, long, default_value = "season.toml")]
    pub season: String,

    /// Reference date for contract-dependent reports (defaults to the season opening date)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = Report::Standings)]
    pub report: Report,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("season", &self.season)
    }
}
