use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Country,
    Circuit,
    Driver,
    Team,
    Car,
    Mechanic,
    Race,
    Contract,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Country => "Country",
            Self::Circuit => "Circuit",
            Self::Driver => "Driver",
            Self::Team => "Team",
            Self::Car => "Car",
            Self::Mechanic => "Mechanic",
            Self::Race => "Race",
            Self::Contract => "Contract",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub age: u32,
    pub nationality: String,
    pub race_number: u32,
    pub experience_years: u32,
    #[serde(default)]
    pub total_points: u32,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub drivers: BTreeSet<u32>,
    #[serde(default)]
    pub mechanics: BTreeSet<String>,
    #[serde(default)]
    pub cars: BTreeSet<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            drivers: BTreeSet::new(),
            mechanics: BTreeSet::new(),
            cars: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub model: String,
    pub chassis_type: String,
    pub engine: String,
    pub year: u16,
    pub chassis_number: String,
    pub weight_kg: f64,
    pub horsepower: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    Tires,
    Engine,
    Electronics,
    Chassis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanic {
    pub dni: String,
    pub name: String,
    pub surname: String,
    pub experience_years: u32,
    #[serde(default)]
    pub specialties: BTreeSet<Specialty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitKind {
    Permanent,
    Street,
    Temporary,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircuitId {
    pub name: String,
    pub country: String,
}

impl CircuitId {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub name: String,
    pub country: String,
    pub length_km: f64,
    pub turn_count: u32,
    pub kind: CircuitKind,
}

impl Circuit {
    pub fn id(&self) -> CircuitId {
        CircuitId::new(self.name.clone(), self.country.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceId {
    pub name: String,
    pub date_time: NaiveDateTime,
}

impl RaceId {
    pub fn new(name: impl Into<String>, date_time: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            date_time,
        }
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ {}", self.name, self.date_time.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationStatus {
    Unresolved,
    Classified(u32),
    Dnf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub driver: u32,
    pub car: String,
    /// Owner of the car when the entry was accepted.
    pub team: String,
    pub final_position: u32,
    pub best_lap: Option<Duration>,
    pub fastest_lap: bool,
    pub podium: bool,
    pub dnf: bool,
    pub dnf_reason: Option<String>,
    pub points_awarded: u32,
}

impl Participation {
    pub(crate) fn new(driver: u32, car: String, team: String) -> Self {
        Self {
            driver,
            car,
            team,
            final_position: 0,
            best_lap: None,
            fastest_lap: false,
            podium: false,
            dnf: false,
            dnf_reason: None,
            points_awarded: 0,
        }
    }

    pub fn status(&self) -> ParticipationStatus {
        if self.dnf {
            ParticipationStatus::Dnf
        } else if self.final_position > 0 {
            ParticipationStatus::Classified(self.final_position)
        } else {
            ParticipationStatus::Unresolved
        }
    }

    pub fn has_result(&self) -> bool {
        self.status() != ParticipationStatus::Unresolved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrandPrix {
    pub name: String,
    pub date_time: NaiveDateTime,
    pub circuit: CircuitId,
    pub participations: Vec<Participation>,
    pub finalized: bool,
}

impl GrandPrix {
    pub fn id(&self) -> RaceId {
        RaceId::new(self.name.clone(), self.date_time)
    }

    pub fn is(&self, id: &RaceId) -> bool {
        self.name == id.name && self.date_time == id.date_time
    }

    pub fn date(&self) -> NaiveDate {
        self.date_time.date()
    }

    pub fn participation(&self, driver: u32) -> Option<&Participation> {
        self.participations.iter().find(|p| p.driver == driver)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverTeamContract {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub driver: u32,
    pub team: String,
}

impl DriverTeamContract {
    /// Open-ended contracts never expire; dated ones stay vigent through their last day.
    pub fn is_vigent(&self, today: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| end >= today)
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && self.is_vigent(day)
    }

    pub fn overlaps(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        let starts_before_other_ends = end.map_or(true, |end| self.start_date <= end);
        let ends_after_other_starts = self.end_date.map_or(true, |own_end| own_end >= start);
        starts_before_other_ends && ends_after_other_starts
    }
}
