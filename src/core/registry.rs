use crate::domain::model::{Car, Circuit, CircuitId, Country, Driver, EntityKind, Mechanic, Team};
use crate::domain::ports::Identified;
use crate::utils::error::{ChampionshipError, Result};
use crate::utils::validation::validate_identity;

/// Reference and roster collections, kept in registration order.
///
/// Readers get shared borrows only; every mutation is crate-private and is reached
/// through [`crate::core::season::Season`], which checks the cross-entity rules first.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    countries: Vec<Country>,
    circuits: Vec<Circuit>,
    drivers: Vec<Driver>,
    teams: Vec<Team>,
    cars: Vec<Car>,
    mechanics: Vec<Mechanic>,
}

fn ensure_unique<T: Identified>(items: &[T], candidate: &T) -> Result<()> {
    let key = candidate.identity();
    if items.iter().any(|existing| existing.identity() == key) {
        return Err(ChampionshipError::DuplicateEntity { kind: T::KIND, key });
    }
    Ok(())
}

fn not_found(kind: EntityKind, key: impl ToString) -> ChampionshipError {
    ChampionshipError::NotFound {
        kind,
        key: key.to_string(),
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn mechanics(&self) -> &[Mechanic] {
        &self.mechanics
    }

    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    pub fn circuit(&self, id: &CircuitId) -> Option<&Circuit> {
        self.circuits
            .iter()
            .find(|c| c.name == id.name && c.country == id.country)
    }

    pub fn driver(&self, race_number: u32) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.race_number == race_number)
    }

    pub fn driver_by_dni(&self, dni: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.dni == dni)
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn car(&self, chassis_number: &str) -> Option<&Car> {
        self.cars.iter().find(|c| c.chassis_number == chassis_number)
    }

    pub fn mechanic(&self, dni: &str) -> Option<&Mechanic> {
        self.mechanics.iter().find(|m| m.dni == dni)
    }

    pub fn car_owner(&self, chassis_number: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.cars.contains(chassis_number))
    }

    pub fn mechanic_team(&self, dni: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.mechanics.contains(dni))
    }

    pub fn free_cars(&self) -> Vec<&Car> {
        self.cars
            .iter()
            .filter(|c| self.car_owner(&c.chassis_number).is_none())
            .collect()
    }

    pub(crate) fn register_country(&mut self, country: Country) -> Result<()> {
        validate_identity("country.code", &country.code)?;
        ensure_unique(&self.countries, &country)?;
        self.countries.push(country);
        Ok(())
    }

    pub(crate) fn register_circuit(&mut self, circuit: Circuit) -> Result<()> {
        validate_identity("circuit.name", &circuit.name)?;
        validate_identity("circuit.country", &circuit.country)?;
        if self.country(&circuit.country).is_none() {
            return Err(not_found(EntityKind::Country, &circuit.country));
        }
        ensure_unique(&self.circuits, &circuit)?;
        self.circuits.push(circuit);
        Ok(())
    }

    pub(crate) fn register_driver(&mut self, driver: Driver) -> Result<()> {
        validate_identity("driver.dni", &driver.dni)?;
        if driver.race_number == 0 {
            return Err(ChampionshipError::NullInput {
                field: "driver.race_number".to_string(),
            });
        }
        ensure_unique(&self.drivers, &driver)?;
        if self.driver_by_dni(&driver.dni).is_some() {
            return Err(ChampionshipError::DuplicateEntity {
                kind: EntityKind::Driver,
                key: driver.dni,
            });
        }
        self.drivers.push(Driver {
            total_points: 0,
            ..driver
        });
        Ok(())
    }

    pub(crate) fn register_team(&mut self, name: &str, country: &str) -> Result<()> {
        validate_identity("team.name", name)?;
        validate_identity("team.country", country)?;
        if self.country(country).is_none() {
            return Err(not_found(EntityKind::Country, country));
        }
        let team = Team::new(name, country);
        ensure_unique(&self.teams, &team)?;
        self.teams.push(team);
        Ok(())
    }

    pub(crate) fn register_car(&mut self, car: Car) -> Result<()> {
        validate_identity("car.chassis_number", &car.chassis_number)?;
        ensure_unique(&self.cars, &car)?;
        self.cars.push(car);
        Ok(())
    }

    pub(crate) fn register_mechanic(&mut self, mechanic: Mechanic) -> Result<()> {
        validate_identity("mechanic.dni", &mechanic.dni)?;
        ensure_unique(&self.mechanics, &mechanic)?;
        self.mechanics.push(mechanic);
        Ok(())
    }

    pub(crate) fn assign_car(&mut self, team: &str, chassis_number: &str) -> Result<()> {
        if self.car(chassis_number).is_none() {
            return Err(not_found(EntityKind::Car, chassis_number));
        }
        if let Some(owner) = self.car_owner(chassis_number) {
            if owner.name == team {
                return Ok(());
            }
            return Err(ChampionshipError::AlreadyAssigned {
                kind: EntityKind::Car,
                key: chassis_number.to_string(),
                team: owner.name.clone(),
            });
        }
        self.team_mut(team)?.cars.insert(chassis_number.to_string());
        Ok(())
    }

    /// Returns the team that owned the car, if any.
    pub(crate) fn release_car(&mut self, chassis_number: &str) -> Result<Option<String>> {
        if self.car(chassis_number).is_none() {
            return Err(not_found(EntityKind::Car, chassis_number));
        }
        let owner = self
            .teams
            .iter_mut()
            .find(|t| t.cars.contains(chassis_number))
            .map(|t| {
                t.cars.remove(chassis_number);
                t.name.clone()
            });
        Ok(owner)
    }

    pub(crate) fn assign_mechanic(&mut self, team: &str, dni: &str) -> Result<()> {
        if self.mechanic(dni).is_none() {
            return Err(not_found(EntityKind::Mechanic, dni));
        }
        if let Some(current) = self.mechanic_team(dni) {
            if current.name == team {
                return Ok(());
            }
            return Err(ChampionshipError::AlreadyAssigned {
                kind: EntityKind::Mechanic,
                key: dni.to_string(),
                team: current.name.clone(),
            });
        }
        self.team_mut(team)?.mechanics.insert(dni.to_string());
        Ok(())
    }

    pub(crate) fn release_mechanic(&mut self, dni: &str) -> Result<Option<String>> {
        if self.mechanic(dni).is_none() {
            return Err(not_found(EntityKind::Mechanic, dni));
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.mechanics.contains(dni))
            .map(|t| {
                t.mechanics.remove(dni);
                t.name.clone()
            });
        Ok(team)
    }

    pub(crate) fn add_team_driver(&mut self, team: &str, race_number: u32) -> Result<()> {
        self.team_mut(team)?.drivers.insert(race_number);
        Ok(())
    }

    pub(crate) fn remove_team_driver(&mut self, team: &str, race_number: u32) -> Result<bool> {
        Ok(self.team_mut(team)?.drivers.remove(&race_number))
    }

    pub(crate) fn unlist_driver(&mut self, race_number: u32) {
        for team in &mut self.teams {
            team.drivers.remove(&race_number);
        }
    }

    pub(crate) fn clear_team_drivers(&mut self) {
        for team in &mut self.teams {
            team.drivers.clear();
        }
    }

    pub(crate) fn driver_mut(&mut self, race_number: u32) -> Result<&mut Driver> {
        self.drivers
            .iter_mut()
            .find(|d| d.race_number == race_number)
            .ok_or_else(|| not_found(EntityKind::Driver, race_number))
    }

    pub(crate) fn remove_driver(&mut self, race_number: u32) -> Result<Driver> {
        let index = self
            .drivers
            .iter()
            .position(|d| d.race_number == race_number)
            .ok_or_else(|| not_found(EntityKind::Driver, race_number))?;
        self.unlist_driver(race_number);
        Ok(self.drivers.remove(index))
    }

    pub(crate) fn remove_car(&mut self, chassis_number: &str) -> Result<Car> {
        let index = self
            .cars
            .iter()
            .position(|c| c.chassis_number == chassis_number)
            .ok_or_else(|| not_found(EntityKind::Car, chassis_number))?;
        self.release_car(chassis_number)?;
        Ok(self.cars.remove(index))
    }

    pub(crate) fn remove_mechanic(&mut self, dni: &str) -> Result<Mechanic> {
        let index = self
            .mechanics
            .iter()
            .position(|m| m.dni == dni)
            .ok_or_else(|| not_found(EntityKind::Mechanic, dni))?;
        self.release_mechanic(dni)?;
        Ok(self.mechanics.remove(index))
    }

    /// Mechanics go back to the pool; a team that still owns cars cannot be removed.
    pub(crate) fn remove_team(&mut self, name: &str) -> Result<Team> {
        let index = self
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| not_found(EntityKind::Team, name))?;
        if !self.teams[index].cars.is_empty() {
            return Err(ChampionshipError::EntityInUse {
                kind: EntityKind::Team,
                key: name.to_string(),
                reason: format!("owns {} car(s)", self.teams[index].cars.len()),
            });
        }
        Ok(self.teams.remove(index))
    }

    fn team_mut(&mut self, name: &str) -> Result<&mut Team> {
        self.teams
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| not_found(EntityKind::Team, name))
    }
}
