use crate::config::settings::EngineSettings;
use crate::core::contracts::ContractLedger;
use crate::core::races::{Award, FinalizePolicy, RaceLedger};
use crate::core::registry::Registry;
use crate::core::scoring;
use crate::domain::model::{
    Car, Circuit, CircuitId, Country, Driver, DriverTeamContract, EntityKind, GrandPrix,
    Mechanic, Participation, RaceId, Team,
};
use crate::utils::error::{ChampionshipError, Result};
use crate::utils::validation::Validate;
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;

/// Stored points that no longer match what the scoring table yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointsDiscrepancy {
    Entry {
        race: RaceId,
        driver: u32,
        stored: u32,
        expected: u32,
    },
    DriverTotal {
        driver: u32,
        stored: u32,
        expected: u32,
    },
}

/// One championship: the registries, the contract history and the race calendar.
///
/// Every command validates against the current state before touching it, so a
/// rejected command leaves the season exactly as it was.
///
/// Team rosters describe the contracts covering one reference day, set by
/// [`Season::recompute_team_rosters`]. Contract commands keep them in step with that
/// day; until a day is set the rosters stay empty.
#[derive(Debug, Clone, Default)]
pub struct Season {
    settings: EngineSettings,
    registry: Registry,
    contracts: ContractLedger,
    races: RaceLedger,
    roster_date: Option<NaiveDate>,
}

fn in_use(kind: EntityKind, key: impl ToString, reason: impl Into<String>) -> ChampionshipError {
    ChampionshipError::EntityInUse {
        kind,
        key: key.to_string(),
        reason: reason.into(),
    }
}

impl Season {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn contract_ledger(&self) -> &ContractLedger {
        &self.contracts
    }

    pub fn race_ledger(&self) -> &RaceLedger {
        &self.races
    }

    /// The day team rosters currently describe.
    pub fn roster_date(&self) -> Option<NaiveDate> {
        self.roster_date
    }

    pub fn countries(&self) -> &[Country] {
        self.registry.countries()
    }

    pub fn circuits(&self) -> &[Circuit] {
        self.registry.circuits()
    }

    pub fn drivers(&self) -> &[Driver] {
        self.registry.drivers()
    }

    pub fn teams(&self) -> &[Team] {
        self.registry.teams()
    }

    pub fn cars(&self) -> &[Car] {
        self.registry.cars()
    }

    pub fn mechanics(&self) -> &[Mechanic] {
        self.registry.mechanics()
    }

    pub fn races(&self) -> &[GrandPrix] {
        self.races.races()
    }

    pub fn contracts(&self) -> &[DriverTeamContract] {
        self.contracts.contracts()
    }

    pub fn driver(&self, race_number: u32) -> Option<&Driver> {
        self.registry.driver(race_number)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.registry.team(name)
    }

    pub fn race(&self, id: &RaceId) -> Option<&GrandPrix> {
        self.races.race(id)
    }

    pub fn participations(&self, id: &RaceId) -> Option<&[Participation]> {
        self.races.race(id).map(|r| r.participations.as_slice())
    }

    // Roster and reference registry

    pub fn register_country(&mut self, country: Country) -> Result<()> {
        let code = country.code.clone();
        self.registry.register_country(country)?;
        tracing::debug!(country = %code, "country registered");
        Ok(())
    }

    pub fn register_circuit(&mut self, circuit: Circuit) -> Result<()> {
        let id = circuit.id();
        self.registry.register_circuit(circuit)?;
        tracing::debug!(circuit = %id, "circuit registered");
        Ok(())
    }

    pub fn register_driver(&mut self, driver: Driver) -> Result<()> {
        let number = driver.race_number;
        self.registry.register_driver(driver)?;
        tracing::debug!(driver = number, "driver registered");
        Ok(())
    }

    pub fn register_team(&mut self, name: &str, country: &str) -> Result<()> {
        self.registry.register_team(name, country)?;
        tracing::debug!(team = name, "team registered");
        Ok(())
    }

    pub fn register_car(&mut self, car: Car) -> Result<()> {
        let chassis = car.chassis_number.clone();
        self.registry.register_car(car)?;
        tracing::debug!(chassis = %chassis, "car registered");
        Ok(())
    }

    pub fn register_mechanic(&mut self, mechanic: Mechanic) -> Result<()> {
        let dni = mechanic.dni.clone();
        self.registry.register_mechanic(mechanic)?;
        tracing::debug!(mechanic = %dni, "mechanic registered");
        Ok(())
    }

    pub fn assign_car(&mut self, team: &str, chassis_number: &str) -> Result<()> {
        self.registry.assign_car(team, chassis_number)?;
        tracing::debug!(team, chassis = chassis_number, "car assigned");
        Ok(())
    }

    /// A car entered in a race that has not been finalized stays with its team;
    /// finalized entries keep the team they were run under.
    pub fn release_car(&mut self, chassis_number: &str) -> Result<Option<String>> {
        let pending = self.races.pending_entries_for_car(chassis_number);
        if pending > 0 {
            return Err(in_use(
                EntityKind::Car,
                chassis_number,
                format!("entered in {} race(s) not yet finalized", pending),
            ));
        }
        let owner = self.registry.release_car(chassis_number)?;
        tracing::debug!(chassis = chassis_number, owner = ?owner, "car released");
        Ok(owner)
    }

    pub fn assign_mechanic(&mut self, team: &str, dni: &str) -> Result<()> {
        self.registry.assign_mechanic(team, dni)?;
        tracing::debug!(team, mechanic = dni, "mechanic assigned");
        Ok(())
    }

    pub fn release_mechanic(&mut self, dni: &str) -> Result<Option<String>> {
        self.registry.release_mechanic(dni)
    }

    pub fn remove_driver(&mut self, race_number: u32) -> Result<Driver> {
        if self.contracts.has_driver(race_number) {
            return Err(in_use(EntityKind::Driver, race_number, "has contract history"));
        }
        let entries = self.races.entries_for_driver(race_number);
        if entries > 0 {
            return Err(in_use(
                EntityKind::Driver,
                race_number,
                format!("entered in {} race(s)", entries),
            ));
        }
        self.registry.remove_driver(race_number)
    }

    pub fn remove_car(&mut self, chassis_number: &str) -> Result<Car> {
        let entries = self.races.entries_for_car(chassis_number);
        if entries > 0 {
            return Err(in_use(
                EntityKind::Car,
                chassis_number,
                format!("entered in {} race(s)", entries),
            ));
        }
        self.registry.remove_car(chassis_number)
    }

    pub fn remove_mechanic(&mut self, dni: &str) -> Result<Mechanic> {
        self.registry.remove_mechanic(dni)
    }

    pub fn remove_team(&mut self, name: &str) -> Result<Team> {
        if self.contracts.has_team(name) {
            return Err(in_use(EntityKind::Team, name, "has contract history"));
        }
        self.registry.remove_team(name)
    }

    // Contract ledger

    /// Signs `driver` with `team`. The driver must not hold an overlapping contract
    /// and must not have unfinished race entries under another team.
    pub fn assign_contract(
        &mut self,
        driver: u32,
        team: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<()> {
        if self.registry.driver(driver).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Driver,
                key: driver.to_string(),
            });
        }
        if self.registry.team(team).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Team,
                key: team.to_string(),
            });
        }
        if let Some(commitment) = self
            .races
            .pending_commitments(driver, from)
            .into_iter()
            .find(|c| c.team != team)
        {
            return Err(ChampionshipError::ContractConflict {
                driver,
                reason: format!(
                    "still entered in {} for '{}'",
                    commitment.race, commitment.team
                ),
            });
        }
        self.contracts.check_assign(driver, from, to)?;

        self.contracts.push(DriverTeamContract {
            start_date: from,
            end_date: to,
            driver,
            team: team.to_string(),
        });
        self.sync_roster(driver)?;
        tracing::debug!(driver, team, %from, "contract signed");
        Ok(())
    }

    /// Ends the driver's running contract on `end_date`. Rejected while the driver is
    /// still entered, for that team, in an unfinalized race the shortened contract
    /// would no longer cover.
    pub fn finalize_contract(&mut self, driver: u32, end_date: NaiveDate) -> Result<DriverTeamContract> {
        let closing = self.contracts.check_close(driver, end_date)?;
        let (team, previous_end) = (closing.team.clone(), closing.end_date);
        if self.registry.team(&team).is_none() {
            return Err(ChampionshipError::NotFound {
                kind: EntityKind::Team,
                key: team,
            });
        }
        if let Some(day_after) = end_date.succ_opt() {
            if let Some(commitment) = self
                .races
                .pending_commitments(driver, day_after)
                .into_iter()
                .find(|c| {
                    c.team == team
                        && previous_end.map_or(true, |end| c.race.date_time.date() <= end)
                })
            {
                return Err(ChampionshipError::ContractConflict {
                    driver,
                    reason: format!(
                        "entered in {} for '{}' after {}; withdraw or finalize that race first",
                        commitment.race, commitment.team, end_date
                    ),
                });
            }
        }

        let closed = self.contracts.close(driver, end_date)?;
        self.sync_roster(driver)?;
        tracing::debug!(driver, team = %team, %end_date, "contract finalized");
        Ok(closed)
    }

    pub fn is_vigent(&self, contract: &DriverTeamContract, today: NaiveDate) -> bool {
        contract.is_vigent(today)
    }

    pub fn current_team(&self, driver: u32, as_of: NaiveDate) -> Option<&Team> {
        self.contracts
            .current_team(driver, as_of)
            .and_then(|name| self.registry.team(name))
    }

    pub fn free_agents(&self, today: NaiveDate) -> Vec<&Driver> {
        self.contracts.free_agents(self.registry.drivers(), today)
    }

    pub fn contract_history(&self, driver: u32) -> Vec<&DriverTeamContract> {
        self.contracts.history(driver)
    }

    /// Removes a driver from a roster without touching contracts. The roster drifts
    /// from the contract history until [`Season::recompute_team_rosters`] runs.
    pub fn detach_driver(&mut self, team: &str, driver: u32) -> Result<bool> {
        self.registry.remove_team_driver(team, driver)
    }

    /// Rebuilds every roster from the contracts covering `today`, which becomes the
    /// roster reference day.
    pub fn recompute_team_rosters(&mut self, today: NaiveDate) {
        self.roster_date = Some(today);
        let members: Vec<(String, u32)> = self
            .contracts
            .covering(today)
            .map(|c| (c.team.clone(), c.driver))
            .collect();
        self.registry.clear_team_drivers();
        for (team, driver) in members {
            if self.registry.add_team_driver(&team, driver).is_err() {
                tracing::warn!(team = %team, driver, "contract references an unknown team");
            }
        }
        tracing::debug!(%today, "team rosters recomputed");
    }

    /// Puts one driver back on the roster of the team holding them on the roster day.
    fn sync_roster(&mut self, driver: u32) -> Result<()> {
        let Some(day) = self.roster_date else {
            return Ok(());
        };
        self.registry.unlist_driver(driver);
        if let Some(team) = self.contracts.current_team(driver, day) {
            self.registry.add_team_driver(team, driver)?;
        }
        Ok(())
    }

    // Race ledger

    pub fn plan_race(
        &mut self,
        name: &str,
        date_time: NaiveDateTime,
        circuit: CircuitId,
        now: NaiveDateTime,
    ) -> Result<RaceId> {
        let id = self
            .races
            .plan(&self.registry, name, date_time, circuit, now)?;
        tracing::debug!(race = %id, "race planned");
        Ok(id)
    }

    pub fn enroll(&mut self, driver: u32, chassis_number: &str, race: &RaceId) -> Result<()> {
        self.races.enroll(
            &self.registry,
            &self.contracts,
            &self.settings,
            race,
            driver,
            chassis_number,
        )?;
        tracing::debug!(driver, chassis = chassis_number, race = %race, "driver entered");
        Ok(())
    }

    pub fn withdraw(&mut self, driver: u32, race: &RaceId) -> Result<Participation> {
        let entry = self.races.withdraw(race, driver)?;
        tracing::debug!(driver, race = %race, "entry withdrawn");
        Ok(entry)
    }

    pub fn record_result(
        &mut self,
        race: &RaceId,
        driver: u32,
        position: u32,
        fastest_lap: bool,
    ) -> Result<()> {
        self.races
            .record_result(race, driver, position, fastest_lap, self.settings.max_grid_size)
    }

    pub fn record_best_lap(&mut self, race: &RaceId, driver: u32, lap: Duration) -> Result<()> {
        self.races.record_best_lap(race, driver, lap)
    }

    pub fn record_dnf(&mut self, race: &RaceId, driver: u32, reason: &str) -> Result<()> {
        self.races.record_dnf(race, driver, reason)
    }

    pub fn finalize_race(&mut self, race: &RaceId) -> Result<Vec<Award>> {
        let policy = if self.settings.allow_empty_finalize {
            FinalizePolicy::AllowEmpty
        } else {
            FinalizePolicy::RequireResults
        };
        self.finalize_race_with(race, policy)
    }

    pub fn finalize_race_with(&mut self, race: &RaceId, policy: FinalizePolicy) -> Result<Vec<Award>> {
        let awards = self.races.finalize(&mut self.registry, race, policy)?;
        let total: u32 = awards.iter().map(|a| a.points).sum();
        tracing::info!(race = %race, classified = awards.len(), points = total, "race finalized");
        Ok(awards)
    }

    pub fn recompute_race_points(&self, race: &RaceId) -> Result<Vec<Award>> {
        self.races.recompute_race_points(race)
    }

    /// Compares stored points of finalized races with the scoring table.
    pub fn audit_points(&self) -> Vec<PointsDiscrepancy> {
        let mut discrepancies = Vec::new();
        for race in self.races.races().iter().filter(|r| r.finalized) {
            for entry in &race.participations {
                let expected = scoring::participation_points(entry);
                if entry.points_awarded != expected {
                    discrepancies.push(PointsDiscrepancy::Entry {
                        race: race.id(),
                        driver: entry.driver,
                        stored: entry.points_awarded,
                        expected,
                    });
                }
            }
        }

        for driver in self.registry.drivers() {
            let expected: u32 = self
                .races
                .races()
                .iter()
                .filter(|r| r.finalized)
                .filter_map(|r| r.participation(driver.race_number))
                .map(scoring::participation_points)
                .sum();
            if driver.total_points != expected {
                discrepancies.push(PointsDiscrepancy::DriverTotal {
                    driver: driver.race_number,
                    stored: driver.total_points,
                    expected,
                });
            }
        }
        discrepancies
    }
}
