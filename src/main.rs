use clap::Parser;
use paddock::app::render::render;
use paddock::utils::error::ErrorCategory;
use paddock::utils::logger::{self, LogFormat};
use paddock::utils::validation::Validate;
use paddock::{ChampionshipError, CliConfig, SeasonFile};

fn exit_code(e: &ChampionshipError) -> i32 {
    match e.category() {
        ErrorCategory::Registry | ErrorCategory::Contract | ErrorCategory::Race => 2,
        ErrorCategory::Config => 1,
        ErrorCategory::System => 3,
    }
}

fn run(config: &CliConfig) -> Result<(), ChampionshipError> {
    config.validate()?;

    tracing::info!("📁 Loading season from: {}", config.season);
    let file = SeasonFile::from_file(&config.season)?;
    let season = file.build()?;

    let today = config.today.unwrap_or_else(|| file.season.opened_at.date());
    tracing::debug!(report = ?config.report, %today, "rendering report");

    let stdout = std::io::stdout();
    render(&season, config.report, config.format, today, stdout.lock())?;

    let discrepancies = season.audit_points();
    if !discrepancies.is_empty() {
        tracing::warn!("{} stored point values disagree with the scoring table", discrepancies.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, config.verbose);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ {} (Category: {:?})",
            e,
            e.category()
        );
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}
