use paddock::app::render::{render, OutputFormat, Report};
use paddock::core::reports;
use paddock::{ChampionshipError, SeasonFile};
use std::io::Write;
use tempfile::NamedTempFile;

const SEASON: &str = r#"
[season]
name = "2024"
opened_at = "2024-01-01T00:00:00"

[engine]
max_grid_size = 20
team_car_quota = 2

[[countries]]
name = "Italy"
code = "ITA"

[[countries]]
name = "Austria"
code = "AUT"

[[circuits]]
name = "Monza"
country = "ITA"
length_km = 5.793
turn_count = 11
kind = "permanent"

[[teams]]
name = "Ferrari"
country = "ITA"
cars = ["SF-1", "SF-2"]
mechanics = ["M-100"]

[[teams]]
name = "Red Bull"
country = "AUT"
cars = ["RB-1", "RB-2"]

[[drivers]]
dni = "C-16"
name = "Charles"
surname = "Leclerc"
age = 26
nationality = "MON"
race_number = 16
experience_years = 6

[[drivers]]
dni = "S-55"
name = "Carlos"
surname = "Sainz"
age = 29
nationality = "ESP"
race_number = 55
experience_years = 9

[[drivers]]
dni = "V-1"
name = "Max"
surname = "Verstappen"
age = 26
nationality = "NED"
race_number = 1
experience_years = 9

[[drivers]]
dni = "P-11"
name = "Sergio"
surname = "Perez"
age = 34
nationality = "MEX"
race_number = 11
experience_years = 13

[[cars]]
model = "SF-24"
chassis_type = "monocoque"
engine = "066/12"
year = 2024
chassis_number = "SF-1"
weight_kg = 798.0
horsepower = 1020

[[cars]]
model = "SF-24"
chassis_type = "monocoque"
engine = "066/12"
year = 2024
chassis_number = "SF-2"
weight_kg = 798.0
horsepower = 1020

[[cars]]
model = "RB20"
chassis_type = "monocoque"
engine = "RBPTH002"
year = 2024
chassis_number = "RB-1"
weight_kg = 798.0
horsepower = 1010

[[cars]]
model = "RB20"
chassis_type = "monocoque"
engine = "RBPTH002"
year = 2024
chassis_number = "RB-2"
weight_kg = 798.0
horsepower = 1010

[[mechanics]]
dni = "M-100"
name = "Giulia"
surname = "Rossi"
experience_years = 11
specialties = ["engine", "tires"]

[[contracts]]
driver = 16
team = "Ferrari"
from = "2019-01-01"

[[contracts]]
driver = 55
team = "Ferrari"
from = "2021-01-01"
to = "2024-12-31"

[[contracts]]
driver = 1
team = "Red Bull"
from = "2016-05-01"

[[contracts]]
driver = 11
team = "Red Bull"
from = "2021-01-01"

[[races]]
name = "Italian GP"
date_time = "2024-09-01T15:00:00"
circuit = "Monza"
country = "ITA"
finalize = true

[[races.entries]]
driver = 16
car = "SF-1"
position = 1
best_lap_ms = 81432

[[races.entries]]
driver = 55
car = "SF-2"
position = 3

[[races.entries]]
driver = 1
car = "RB-1"
position = 2
fastest_lap = true

[[races.entries]]
driver = 11
car = "RB-2"
dnf = "brakes"
"#;

fn season_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SEASON.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_build_season() {
    let file = season_file();
    let season = SeasonFile::from_file(file.path()).unwrap().build().unwrap();

    assert_eq!(season.teams().len(), 2);
    assert_eq!(season.drivers().len(), 4);
    assert_eq!(season.races().len(), 1);
    assert!(season.races()[0].finalized);

    assert_eq!(season.driver(16).unwrap().total_points, 25);
    assert_eq!(season.driver(1).unwrap().total_points, 19);
    assert_eq!(season.driver(55).unwrap().total_points, 15);
    assert_eq!(season.driver(11).unwrap().total_points, 0);

    let leclerc = season.races()[0].participation(16).unwrap();
    assert_eq!(leclerc.best_lap.map(|l| l.as_millis()), Some(81432));
    assert_eq!(
        season.registry().mechanic_team("M-100").map(|t| t.name.as_str()),
        Some("Ferrari")
    );

    let ranking = reports::ranking(&season);
    assert_eq!(ranking[0].race_number, 16);
    assert_eq!(ranking[1].race_number, 1);
}

#[test]
fn test_render_constructors_csv() {
    let file = season_file();
    let season = SeasonFile::from_file(file.path()).unwrap().build().unwrap();
    let mut out = Vec::new();
    let today = chrono::NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    render(&season, Report::Constructors, OutputFormat::Csv, today, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "position,team,points\n1,Ferrari,40\n2,Red Bull,19\n");
}

#[test]
fn test_rule_violation_in_file_is_reported() {
    let broken = SEASON.replace("car = \"RB-2\"", "car = \"SF-1\"");
    let err = SeasonFile::from_toml_str(&broken)
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ChampionshipError::CarUnavailable { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SeasonFile::from_file("/definitely/not/here/season.toml").unwrap_err();
    assert!(matches!(err, ChampionshipError::IoError(_)));
}
