#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use paddock::domain::model::{Car, Circuit, CircuitId, CircuitKind, Country, Driver};
use paddock::Season;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid date time")
}

pub fn driver(number: u32, name: &str, surname: &str) -> Driver {
    Driver {
        dni: format!("DNI-{}", number),
        name: name.to_string(),
        surname: surname.to_string(),
        age: 28,
        nationality: "GBR".to_string(),
        race_number: number,
        experience_years: 6,
        total_points: 0,
    }
}

pub fn car(chassis: &str) -> Car {
    Car {
        model: "W15".to_string(),
        chassis_type: "carbon monocoque".to_string(),
        engine: "V6 turbo hybrid".to_string(),
        year: 2024,
        chassis_number: chassis.to_string(),
        weight_kg: 798.0,
        horsepower: 1000,
    }
}

pub fn silverstone() -> CircuitId {
    CircuitId::new("Silverstone", "GBR")
}

pub fn spa() -> CircuitId {
    CircuitId::new("Spa-Francorchamps", "BEL")
}

/// Chassis numbers are the first three letters of the team, upper-cased, plus 1..=3.
pub fn chassis(team: &str, n: u32) -> String {
    format!("{}-{}", team[..3].to_uppercase(), n)
}

/// Two countries, two circuits, three teams with three cars each and two drivers
/// per team signed open-ended from 2024-01-01. Rosters describe 2024-01-01.
pub fn season() -> Season {
    let mut season = Season::new();
    season.recompute_team_rosters(date("2024-01-01"));
    for (name, code) in [("United Kingdom", "GBR"), ("Belgium", "BEL")] {
        season
            .register_country(Country {
                name: name.to_string(),
                code: code.to_string(),
            })
            .unwrap();
    }
    season
        .register_circuit(Circuit {
            name: "Silverstone".to_string(),
            country: "GBR".to_string(),
            length_km: 5.891,
            turn_count: 18,
            kind: CircuitKind::Permanent,
        })
        .unwrap();
    season
        .register_circuit(Circuit {
            name: "Spa-Francorchamps".to_string(),
            country: "BEL".to_string(),
            length_km: 7.004,
            turn_count: 19,
            kind: CircuitKind::Permanent,
        })
        .unwrap();

    let roster = [
        ("Mercedes", [(44, "Lewis", "Hamilton"), (63, "George", "Russell")]),
        ("McLaren", [(4, "Lando", "Norris"), (81, "Oscar", "Piastri")]),
        ("Williams", [(23, "Alex", "Albon"), (2, "Logan", "Sargeant")]),
    ];
    for (team, drivers) in roster {
        season.register_team(team, "GBR").unwrap();
        for n in 1..=3 {
            let chassis = chassis(team, n);
            season.register_car(car(&chassis)).unwrap();
            season.assign_car(team, &chassis).unwrap();
        }
        for (number, name, surname) in drivers {
            season.register_driver(driver(number, name, surname)).unwrap();
            season
                .assign_contract(number, team, date("2024-01-01"), None)
                .unwrap();
        }
    }
    season
}
