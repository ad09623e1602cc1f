use crate::config::settings::EngineSettings;
use crate::core::contracts::ContractLedger;
use crate::core::registry::Registry;
use crate::core::scoring;
use crate::domain::model::{
    CircuitId, EntityKind, GrandPrix, Participation, ParticipationStatus, RaceId,
};
use crate::utils::error::{ChampionshipError, Result};
use crate::utils::validation::validate_identity;
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizePolicy {
    RequireResults,
    AllowEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub driver: u32,
    pub points: u32,
}

/// A race entry that still has to be run under a given team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    pub race: RaceId,
    pub team: String,
}

#[derive(Debug, Clone, Default)]
pub struct RaceLedger {
    races: Vec<GrandPrix>,
}

fn race_not_found(id: &RaceId) -> ChampionshipError {
    ChampionshipError::NotFound {
        kind: EntityKind::Race,
        key: id.to_string(),
    }
}

/// Classified positions must be exactly 1..=k.
fn check_classification(race: &GrandPrix) -> Result<()> {
    let mut positions: Vec<u32> = race
        .participations
        .iter()
        .filter_map(|p| match p.status() {
            ParticipationStatus::Classified(position) => Some(position),
            _ => None,
        })
        .collect();
    positions.sort_unstable();

    for (expected, &position) in (1u32..).zip(&positions) {
        if position != expected {
            let reason = if position < expected {
                format!("position {} is held by more than one driver", position)
            } else {
                format!("position {} is missing", expected)
            };
            return Err(ChampionshipError::InvalidClassification {
                race: race.id(),
                reason,
            });
        }
    }
    Ok(())
}

impl RaceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn races(&self) -> &[GrandPrix] {
        &self.races
    }

    pub fn race(&self, id: &RaceId) -> Option<&GrandPrix> {
        self.races.iter().find(|r| r.is(id))
    }

    pub fn participation(&self, id: &RaceId, driver: u32) -> Option<&Participation> {
        self.race(id).and_then(|r| r.participation(driver))
    }

    /// Unfinalized entries of `driver` dated on or after `from`.
    pub fn pending_commitments(&self, driver: u32, from: NaiveDate) -> Vec<Commitment> {
        self.races
            .iter()
            .filter(|r| !r.finalized && r.date() >= from)
            .filter_map(|r| {
                r.participation(driver).map(|p| Commitment {
                    race: r.id(),
                    team: p.team.clone(),
                })
            })
            .collect()
    }

    pub fn entries_for_driver(&self, driver: u32) -> usize {
        self.races
            .iter()
            .filter(|r| r.participation(driver).is_some())
            .count()
    }

    pub fn entries_for_car(&self, chassis_number: &str) -> usize {
        self.races
            .iter()
            .flat_map(|r| r.participations.iter())
            .filter(|p| p.car == chassis_number)
            .count()
    }

    /// Entries of the car in races that can still change.
    pub fn pending_entries_for_car(&self, chassis_number: &str) -> usize {
        self.races
            .iter()
            .filter(|r| !r.finalized)
            .flat_map(|r| r.participations.iter())
            .filter(|p| p.car == chassis_number)
            .count()
    }

    pub(crate) fn plan(
        &mut self,
        registry: &Registry,
        name: &str,
        date_time: NaiveDateTime,
        circuit: CircuitId,
        now: NaiveDateTime,
    ) -> Result<RaceId> {
        validate_identity("race.name", name)?;
        let id = RaceId::new(name, date_time);
        if self.race(&id).is_some() {
            return Err(ChampionshipError::DuplicateEntity {
                kind: EntityKind::Race,
                key: id.to_string(),
            });
        }
        if date_time < now {
            return Err(ChampionshipError::PastRaceDate { race: id, now });
        }
        if registry.circuit(&circuit).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Circuit,
                key: circuit.to_string(),
            });
        }

        self.races.push(GrandPrix {
            name: name.to_string(),
            date_time,
            circuit,
            participations: Vec::new(),
            finalized: false,
        });
        Ok(id)
    }

    /// Admission checks run in a fixed order and stop at the first failure.
    pub(crate) fn enroll(
        &mut self,
        registry: &Registry,
        contracts: &ContractLedger,
        settings: &EngineSettings,
        id: &RaceId,
        driver: u32,
        chassis_number: &str,
    ) -> Result<()> {
        let race = self.race_mut(id)?;
        if registry.driver(driver).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Driver,
                key: driver.to_string(),
            });
        }
        if registry.car(chassis_number).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Car,
                key: chassis_number.to_string(),
            });
        }

        if race.finalized {
            return Err(ChampionshipError::RaceFinalized { race: id.clone() });
        }
        if race.participations.iter().any(|p| p.car == chassis_number) {
            return Err(ChampionshipError::CarUnavailable {
                chassis: chassis_number.to_string(),
                race: id.clone(),
            });
        }
        if race.participation(driver).is_some() {
            return Err(ChampionshipError::DriverAlreadyEnrolled {
                driver,
                race: id.clone(),
            });
        }

        let car_team = registry.car_owner(chassis_number).map(|t| t.name.as_str());
        let driver_team = contracts.current_team(driver, race.date());
        let team = match (car_team, driver_team) {
            (Some(car_team), Some(driver_team)) if car_team == driver_team => car_team,
            (car_team, driver_team) => {
                return Err(ChampionshipError::TeamMismatch {
                    driver,
                    chassis: chassis_number.to_string(),
                    car_team: car_team.unwrap_or("no team").to_string(),
                    driver_team: driver_team.unwrap_or("no team").to_string(),
                });
            }
        };

        let entered = race.participations.iter().filter(|p| p.team == team).count();
        if entered >= settings.team_car_quota {
            return Err(ChampionshipError::TeamQuotaExceeded {
                team: team.to_string(),
                race: id.clone(),
                quota: settings.team_car_quota,
            });
        }

        race.participations.push(Participation::new(
            driver,
            chassis_number.to_string(),
            team.to_string(),
        ));
        Ok(())
    }

    pub(crate) fn withdraw(&mut self, id: &RaceId, driver: u32) -> Result<Participation> {
        let race = self.open_race_mut(id)?;
        let index = race
            .participations
            .iter()
            .position(|p| p.driver == driver)
            .ok_or_else(|| ChampionshipError::NotEnrolled {
                driver,
                race: id.clone(),
            })?;
        Ok(race.participations.remove(index))
    }

    pub(crate) fn record_result(
        &mut self,
        id: &RaceId,
        driver: u32,
        position: u32,
        fastest_lap: bool,
        max_position: u32,
    ) -> Result<()> {
        let race = self.open_race_mut(id)?;
        if race.participation(driver).is_none() {
            return Err(ChampionshipError::NotEnrolled {
                driver,
                race: id.clone(),
            });
        }
        if position < 1 || position > max_position {
            return Err(ChampionshipError::InvalidPosition {
                position,
                max: max_position,
            });
        }

        for entry in &mut race.participations {
            if entry.driver == driver {
                entry.final_position = position;
                entry.podium = (1..=3).contains(&position);
                entry.dnf = false;
                entry.dnf_reason = None;
                entry.fastest_lap = fastest_lap;
            } else if fastest_lap {
                entry.fastest_lap = false;
            }
        }
        Ok(())
    }

    pub(crate) fn record_best_lap(&mut self, id: &RaceId, driver: u32, lap: Duration) -> Result<()> {
        let entry = self.open_entry_mut(id, driver)?;
        entry.best_lap = Some(lap);
        Ok(())
    }

    pub(crate) fn record_dnf(&mut self, id: &RaceId, driver: u32, reason: &str) -> Result<()> {
        let entry = self.open_entry_mut(id, driver)?;
        entry.dnf = true;
        entry.dnf_reason = Some(reason.to_string());
        entry.final_position = 0;
        entry.podium = false;
        entry.fastest_lap = false;
        entry.points_awarded = 0;
        Ok(())
    }

    /// Locks the race and credits points to each classified driver. Not reversible.
    pub(crate) fn finalize(
        &mut self,
        registry: &mut Registry,
        id: &RaceId,
        policy: FinalizePolicy,
    ) -> Result<Vec<Award>> {
        let race = self.race_mut(id)?;
        if race.finalized {
            return Err(ChampionshipError::AlreadyFinalized { race: id.clone() });
        }
        if policy == FinalizePolicy::RequireResults
            && !race.participations.iter().any(Participation::has_result)
        {
            return Err(ChampionshipError::NoResults { race: id.clone() });
        }
        check_classification(race)?;

        let awards: Vec<Award> = race
            .participations
            .iter()
            .filter(|p| p.final_position > 0)
            .map(|p| Award {
                driver: p.driver,
                points: scoring::participation_points(p),
            })
            .collect();
        for award in &awards {
            registry.driver_mut(award.driver)?;
        }

        for award in &awards {
            if let Some(entry) = race
                .participations
                .iter_mut()
                .find(|p| p.driver == award.driver)
            {
                entry.points_awarded += award.points;
            }
            registry.driver_mut(award.driver)?.total_points += award.points;
        }
        race.finalized = true;
        Ok(awards)
    }

    /// Points each entry would earn now; stored values are left untouched.
    pub fn recompute_race_points(&self, id: &RaceId) -> Result<Vec<Award>> {
        let race = self.race(id).ok_or_else(|| race_not_found(id))?;
        Ok(race
            .participations
            .iter()
            .map(|p| Award {
                driver: p.driver,
                points: scoring::participation_points(p),
            })
            .collect())
    }

    fn race_mut(&mut self, id: &RaceId) -> Result<&mut GrandPrix> {
        self.races
            .iter_mut()
            .find(|r| r.is(id))
            .ok_or_else(|| race_not_found(id))
    }

    fn open_race_mut(&mut self, id: &RaceId) -> Result<&mut GrandPrix> {
        let race = self.race_mut(id)?;
        if race.finalized {
            return Err(ChampionshipError::RaceFinalized { race: id.clone() });
        }
        Ok(race)
    }

    fn open_entry_mut(&mut self, id: &RaceId, driver: u32) -> Result<&mut Participation> {
        let race = self.open_race_mut(id)?;
        race.participations
            .iter_mut()
            .find(|p| p.driver == driver)
            .ok_or_else(|| ChampionshipError::NotEnrolled {
                driver,
                race: id.clone(),
            })
    }
}
