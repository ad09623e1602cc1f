use crate::domain::model::{EntityKind, RaceId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChampionshipError {
    #[error("{kind} '{key}' is already registered")]
    DuplicateEntity { kind: EntityKind, key: String },

    #[error("Missing required input: {field}")]
    NullInput { field: String },

    #[error("{kind} '{key}' does not exist")]
    NotFound { kind: EntityKind, key: String },

    #[error("Contract conflict for driver #{driver}: {reason}")]
    ContractConflict { driver: u32, reason: String },

    #[error("Driver #{driver} has no open contract")]
    NoActiveContract { driver: u32 },

    #[error("Invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    #[error("Race {race} is scheduled before {now}")]
    PastRaceDate {
        race: RaceId,
        now: chrono::NaiveDateTime,
    },

    #[error("Race {race} is finalized; its entries can no longer change")]
    RaceFinalized { race: RaceId },

    #[error("Car '{chassis}' is already entered in {race}")]
    CarUnavailable { chassis: String, race: RaceId },

    #[error("Driver #{driver} is already entered in {race}")]
    DriverAlreadyEnrolled { driver: u32, race: RaceId },

    #[error("Driver #{driver} is not entered in {race}")]
    NotEnrolled { driver: u32, race: RaceId },

    #[error("Car '{chassis}' belongs to {car_team} but driver #{driver} drives for {driver_team}")]
    TeamMismatch {
        driver: u32,
        chassis: String,
        car_team: String,
        driver_team: String,
    },

    #[error("Team '{team}' already has {quota} cars entered in {race}")]
    TeamQuotaExceeded {
        team: String,
        race: RaceId,
        quota: usize,
    },

    #[error("Position {position} is outside 1..={max}")]
    InvalidPosition { position: u32, max: u32 },

    #[error("Race {race} has an invalid classification: {reason}")]
    InvalidClassification { race: RaceId, reason: String },

    #[error("Race {race} is already finalized")]
    AlreadyFinalized { race: RaceId },

    #[error("Race {race} has no recorded results")]
    NoResults { race: RaceId },

    #[error("{kind} '{key}' is already assigned to team '{team}'")]
    AlreadyAssigned {
        kind: EntityKind,
        key: String,
        team: String,
    },

    #[error("{kind} '{key}' is still in use: {reason}")]
    EntityInUse {
        kind: EntityKind,
        key: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Contract,
    Race,
    Config,
    System,
}

impl ChampionshipError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateEntity { .. }
            | Self::NullInput { .. }
            | Self::NotFound { .. }
            | Self::AlreadyAssigned { .. }
            | Self::EntityInUse { .. } => ErrorCategory::Registry,
            Self::ContractConflict { .. }
            | Self::NoActiveContract { .. }
            | Self::InvalidDateRange { .. } => ErrorCategory::Contract,
            Self::PastRaceDate { .. }
            | Self::RaceFinalized { .. }
            | Self::CarUnavailable { .. }
            | Self::DriverAlreadyEnrolled { .. }
            | Self::NotEnrolled { .. }
            | Self::TeamMismatch { .. }
            | Self::TeamQuotaExceeded { .. }
            | Self::InvalidPosition { .. }
            | Self::InvalidClassification { .. }
            | Self::AlreadyFinalized { .. }
            | Self::NoResults { .. } => ErrorCategory::Race,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::CsvError(_) | Self::JsonError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DuplicateEntity { .. } => "Use a different identifier or update the existing entry",
            Self::NullInput { .. } => "Fill in every identifying field",
            Self::NotFound { .. } => "Register the referenced entity first",
            Self::ContractConflict { .. } | Self::NoActiveContract { .. } => {
                "Finalize the driver's open contract and resolve pending race entries first"
            }
            Self::InvalidDateRange { .. } | Self::PastRaceDate { .. } => "Check the dates",
            Self::RaceFinalized { .. } | Self::AlreadyFinalized { .. } => {
                "Finalized races are locked; plan a new race instead"
            }
            Self::CarUnavailable { .. } | Self::DriverAlreadyEnrolled { .. } => {
                "Each driver and each car may be entered once per race"
            }
            Self::NotEnrolled { .. } => "Enter the driver in the race first",
            Self::TeamMismatch { .. } => "Pick a car owned by the driver's current team",
            Self::TeamQuotaExceeded { .. } => "Withdraw another car of the same team",
            Self::InvalidPosition { .. } | Self::InvalidClassification { .. } => {
                "Classified positions must run 1, 2, 3... without gaps or repeats"
            }
            Self::NoResults { .. } => "Record results or finalize with an explicit override",
            Self::AlreadyAssigned { .. } => "Release it from its current team first",
            Self::EntityInUse { .. } => "Remove the references to it first",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => "Check the season file",
            Self::IoError(_) | Self::CsvError(_) | Self::JsonError(_) => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, ChampionshipError>;
