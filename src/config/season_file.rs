use crate::config::settings::EngineSettings;
use crate::core::season::Season;
use crate::domain::model::{Car, Circuit, CircuitId, Country, Driver, Mechanic, RaceId};
use crate::utils::error::{ChampionshipError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A season described in TOML. Dates are quoted strings (`"2024-03-02"`,
/// `"2024-03-02T15:00:00"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonFile {
    pub season: SeasonMeta,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub countries: Vec<Country>,
    #[serde(default)]
    pub circuits: Vec<Circuit>,
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub cars: Vec<Car>,
    #[serde(default)]
    pub mechanics: Vec<Mechanic>,
    #[serde(default)]
    pub contracts: Vec<ContractEntry>,
    #[serde(default)]
    pub races: Vec<RaceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonMeta {
    pub name: String,
    /// The calendar is checked against this instant: races dated before it are rejected.
    pub opened_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub cars: Vec<String>,
    #[serde(default)]
    pub mechanics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEntry {
    pub driver: u32,
    pub team: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEntry {
    pub name: String,
    pub date_time: NaiveDateTime,
    pub circuit: String,
    pub country: String,
    #[serde(default)]
    pub finalize: bool,
    #[serde(default)]
    pub entries: Vec<GridEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridEntry {
    pub driver: u32,
    pub car: String,
    pub position: Option<u32>,
    #[serde(default)]
    pub fastest_lap: bool,
    /// Retirement reason; an entry with one has no position.
    pub dnf: Option<String>,
    pub best_lap_ms: Option<u64>,
}

impl SeasonFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = expand_env_placeholders(content)?;

        toml::from_str(&processed).map_err(|e| ChampionshipError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replays the file through the season commands so every rule is enforced as if
    /// the entries had been typed in one by one.
    pub fn build(&self) -> Result<Season> {
        self.validate()?;
        let mut season = Season::with_settings(self.engine.clone())?;

        for country in &self.countries {
            season.register_country(country.clone())?;
        }
        for circuit in &self.circuits {
            season.register_circuit(circuit.clone())?;
        }
        for team in &self.teams {
            season.register_team(&team.name, &team.country)?;
        }
        for driver in &self.drivers {
            season.register_driver(driver.clone())?;
        }
        for car in &self.cars {
            season.register_car(car.clone())?;
        }
        for mechanic in &self.mechanics {
            season.register_mechanic(mechanic.clone())?;
        }
        for team in &self.teams {
            for chassis in &team.cars {
                season.assign_car(&team.name, chassis)?;
            }
            for dni in &team.mechanics {
                season.assign_mechanic(&team.name, dni)?;
            }
        }
        season.recompute_team_rosters(self.season.opened_at.date());
        for contract in &self.contracts {
            season.assign_contract(contract.driver, &contract.team, contract.from, contract.to)?;
        }

        for race in &self.races {
            let id = season.plan_race(
                &race.name,
                race.date_time,
                CircuitId::new(race.circuit.clone(), race.country.clone()),
                self.season.opened_at,
            )?;
            self.apply_entries(&mut season, &id, race)?;
            if race.finalize {
                season.finalize_race(&id)?;
            }
        }

        tracing::info!(
            season = %self.season.name,
            drivers = season.drivers().len(),
            races = season.races().len(),
            "season loaded"
        );
        Ok(season)
    }

    fn apply_entries(&self, season: &mut Season, id: &RaceId, race: &RaceEntry) -> Result<()> {
        for entry in &race.entries {
            season.enroll(entry.driver, &entry.car, id)?;
        }
        for entry in &race.entries {
            if let Some(lap) = entry.best_lap_ms {
                season.record_best_lap(id, entry.driver, Duration::from_millis(lap))?;
            }
            match (&entry.dnf, entry.position) {
                (Some(reason), _) => season.record_dnf(id, entry.driver, reason)?,
                (None, Some(position)) => {
                    season.record_result(id, entry.driver, position, entry.fastest_lap)?
                }
                (None, None) => {}
            }
        }
        Ok(())
    }
}

/// Expands `${VAR}` and `${VAR:-fallback}` from the environment. Variables with
/// neither a value nor a fallback are all reported in one error.
fn expand_env_placeholders(content: &str) -> Result<String> {
    let placeholder = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").map_err(|e| {
        ChampionshipError::ConfigError {
            message: e.to_string(),
        }
    })?;

    let mut undefined = Vec::new();
    let expanded = placeholder.replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        match (std::env::var(name), caps.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(fallback)) => fallback.as_str().to_string(),
            (Err(_), None) => {
                undefined.push(name.to_string());
                String::new()
            }
        }
    });

    if !undefined.is_empty() {
        return Err(ChampionshipError::ConfigError {
            message: format!(
                "season file uses undefined environment variable(s): {}",
                undefined.join(", ")
            ),
        });
    }
    Ok(expanded.into_owned())
}

impl Validate for SeasonFile {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("season.name", &self.season.name)?;
        self.engine.validate()?;

        for race in &self.races {
            for entry in &race.entries {
                if entry.dnf.is_some() && entry.position.is_some() {
                    return Err(ChampionshipError::InvalidConfigValueError {
                        field: format!("races.entries (driver {})", entry.driver),
                        value: race.name.clone(),
                        reason: "an entry cannot have both a position and a dnf reason"
                            .to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
