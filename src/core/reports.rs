//! Read-only views derived from a [`Season`].
//!
//! Podium, victory and constructor figures only count finalized races; planned races
//! can still change. Circuit and participation counts include every planned race.

use crate::core::season::Season;
use crate::domain::model::{CircuitId, GrandPrix, ParticipationStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub position: usize,
    pub race_number: u32,
    pub driver: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorStanding {
    pub position: usize,
    pub team: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverTally {
    pub race_number: u32,
    pub driver: String,
    pub podiums: usize,
    pub victories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitTally {
    pub circuit: String,
    pub country: String,
    pub races: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverCircuitTally {
    pub race_number: u32,
    pub circuit: String,
    pub country: String,
    pub participations: usize,
}

fn finalized(season: &Season) -> impl Iterator<Item = &GrandPrix> {
    season.races().iter().filter(|r| r.finalized)
}

/// Drivers by total points, highest first; ties keep registration order.
pub fn ranking(season: &Season) -> Vec<Standing> {
    let mut drivers: Vec<_> = season.drivers().iter().collect();
    drivers.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    drivers
        .into_iter()
        .enumerate()
        .map(|(i, d)| Standing {
            position: i + 1,
            race_number: d.race_number,
            driver: d.full_name(),
            points: d.total_points,
        })
        .collect()
}

pub fn constructor_standings(season: &Season) -> Vec<ConstructorStanding> {
    let mut teams: Vec<(String, u32)> = season
        .teams()
        .iter()
        .map(|team| {
            let points = finalized(season)
                .flat_map(|r| r.participations.iter())
                .filter(|p| p.team == team.name)
                .map(|p| p.points_awarded)
                .sum();
            (team.name.clone(), points)
        })
        .collect();
    teams.sort_by(|a, b| b.1.cmp(&a.1));
    teams
        .into_iter()
        .enumerate()
        .map(|(i, (team, points))| ConstructorStanding {
            position: i + 1,
            team,
            points,
        })
        .collect()
}

pub fn podium_counts(season: &Season) -> Vec<DriverTally> {
    season
        .drivers()
        .iter()
        .map(|d| {
            let entries: Vec<_> = finalized(season)
                .filter_map(|r| r.participation(d.race_number))
                .collect();
            DriverTally {
                race_number: d.race_number,
                driver: d.full_name(),
                podiums: entries.iter().filter(|p| p.podium).count(),
                victories: entries
                    .iter()
                    .filter(|p| p.status() == ParticipationStatus::Classified(1))
                    .count(),
            }
        })
        .collect()
}

pub fn races_per_circuit(season: &Season) -> Vec<CircuitTally> {
    season
        .circuits()
        .iter()
        .map(|c| {
            let id = c.id();
            CircuitTally {
                circuit: c.name.clone(),
                country: c.country.clone(),
                races: season.races().iter().filter(|r| r.circuit == id).count(),
            }
        })
        .collect()
}

/// Only pairs with at least one entry are listed, drivers first, then circuits,
/// both in registration order.
pub fn driver_circuit_participations(season: &Season) -> Vec<DriverCircuitTally> {
    let circuits: Vec<CircuitId> = season.circuits().iter().map(|c| c.id()).collect();
    let mut tallies = Vec::new();
    for driver in season.drivers() {
        for circuit in &circuits {
            let participations = season
                .races()
                .iter()
                .filter(|r| &r.circuit == circuit && r.participation(driver.race_number).is_some())
                .count();
            if participations > 0 {
                tallies.push(DriverCircuitTally {
                    race_number: driver.race_number,
                    circuit: circuit.name.clone(),
                    country: circuit.country.clone(),
                    participations,
                });
            }
        }
    }
    tallies
}
