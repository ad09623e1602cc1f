mod common;

use common::{at, chassis, date, season, silverstone, spa};
use paddock::ChampionshipError;

#[test]
fn test_pending_race_blocks_team_change() {
    let mut season = season();
    let race = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    season.enroll(44, &chassis("Mercedes", 1), &race).unwrap();

    let err = season
        .assign_contract(44, "Williams", date("2024-07-01"), None)
        .unwrap_err();
    assert!(matches!(err, ChampionshipError::ContractConflict { driver: 44, .. }));

    // Once the race is run and locked, the move goes through.
    season.record_result(&race, 44, 1, false).unwrap();
    season.finalize_race(&race).unwrap();
    season.finalize_contract(44, date("2024-07-31")).unwrap();
    season
        .assign_contract(44, "Williams", date("2024-08-01"), None)
        .unwrap();
    assert_eq!(
        season.current_team(44, date("2024-08-01")).map(|t| t.name.as_str()),
        Some("Williams")
    );
}

#[test]
fn test_contract_cannot_end_before_pending_race() {
    let mut season = season();
    let race = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    season.enroll(44, &chassis("Mercedes", 1), &race).unwrap();

    let err = season.finalize_contract(44, date("2024-06-30")).unwrap_err();
    assert!(matches!(err, ChampionshipError::ContractConflict { driver: 44, .. }));
    assert_eq!(season.contract_history(44)[0].end_date, None);
    assert_eq!(
        season.current_team(44, date("2024-07-07")).map(|t| t.name.as_str()),
        Some("Mercedes")
    );

    // Ending on race day still covers the entry.
    season.finalize_contract(44, date("2024-07-07")).unwrap();
}

#[test]
fn test_withdrawn_entry_no_longer_blocks_contract_end() {
    let mut season = season();
    let race = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    season.enroll(44, &chassis("Mercedes", 1), &race).unwrap();
    season.withdraw(44, &race).unwrap();

    season.finalize_contract(44, date("2024-06-30")).unwrap();
    assert!(season.current_team(44, date("2024-07-07")).is_none());
    assert!(matches!(
        season.enroll(44, &chassis("Mercedes", 1), &race),
        Err(ChampionshipError::TeamMismatch { .. })
    ));
}

#[test]
fn test_car_in_pending_race_cannot_change_hands() {
    let mut season = season();
    let race = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    let car = chassis("Mercedes", 1);
    season.enroll(44, &car, &race).unwrap();

    assert!(matches!(
        season.release_car(&car),
        Err(ChampionshipError::EntityInUse { .. })
    ));
    assert_eq!(
        season.registry().car_owner(&car).map(|t| t.name.as_str()),
        Some("Mercedes")
    );

    season.record_result(&race, 44, 1, false).unwrap();
    season.finalize_race(&race).unwrap();
    assert_eq!(season.release_car(&car).unwrap().as_deref(), Some("Mercedes"));
    season.assign_car("Williams", &car).unwrap();
    assert_eq!(season.participations(&race).unwrap()[0].team, "Mercedes");
}

#[test]
fn test_rosters_follow_contracts_on_roster_day() {
    let mut season = season();
    season
        .register_driver(common::driver(7, "Kimi", "Raikkonen"))
        .unwrap();

    // Long expired on the roster day.
    season
        .assign_contract(7, "McLaren", date("2019-01-01"), Some(date("2020-12-31")))
        .unwrap();
    assert!(!season.team("McLaren").unwrap().drivers.contains(&7));

    // Not started yet on the roster day.
    season
        .assign_contract(7, "Williams", date("2025-01-01"), None)
        .unwrap();
    assert!(!season.team("Williams").unwrap().drivers.contains(&7));

    // An end date months ahead leaves the driver in place until then.
    season.finalize_contract(4, date("2024-12-31")).unwrap();
    assert!(season.team("McLaren").unwrap().drivers.contains(&4));

    season.recompute_team_rosters(date("2025-01-01"));
    assert!(!season.team("McLaren").unwrap().drivers.contains(&4));
    assert!(season.team("Williams").unwrap().drivers.contains(&7));
    assert_eq!(season.roster_date(), Some(date("2025-01-01")));
}

#[test]
fn test_past_race_does_not_block() {
    let mut season = season();
    let race = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    season.enroll(63, &chassis("Mercedes", 2), &race).unwrap();
    season.finalize_contract(63, date("2024-07-31")).unwrap();

    // The entry is dated before the new contract starts.
    season
        .assign_contract(63, "McLaren", date("2024-08-01"), None)
        .unwrap();
}

#[test]
fn test_overlapping_contract_requires_finalize() {
    let mut season = season();
    let err = season
        .assign_contract(4, "Williams", date("2025-01-01"), None)
        .unwrap_err();
    assert!(matches!(err, ChampionshipError::ContractConflict { .. }));

    // Same team, same period: still a conflict.
    assert!(season
        .assign_contract(4, "McLaren", date("2025-01-01"), None)
        .is_err());
    assert_eq!(season.contract_history(4).len(), 1);

    season.finalize_contract(4, date("2024-12-31")).unwrap();
    season
        .assign_contract(4, "Williams", date("2025-01-01"), Some(date("2026-12-31")))
        .unwrap();

    let history = season.contract_history(4);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].team, "McLaren");
    assert_eq!(history[0].end_date, Some(date("2024-12-31")));
    assert_eq!(history[1].team, "Williams");
}

#[test]
fn test_car_must_match_contract_on_race_day() {
    let mut season = season();
    season.finalize_contract(23, date("2024-07-15")).unwrap();
    season
        .assign_contract(23, "Mercedes", date("2024-07-16"), None)
        .unwrap();

    let british = season
        .plan_race("British GP", at("2024-07-07 15:00"), silverstone(), at("2024-01-01 00:00"))
        .unwrap();
    let belgian = season
        .plan_race("Belgian GP", at("2024-07-28 15:00"), spa(), at("2024-01-01 00:00"))
        .unwrap();

    season.enroll(23, &chassis("Williams", 1), &british).unwrap();
    assert!(matches!(
        season.enroll(23, &chassis("Williams", 1), &belgian),
        Err(ChampionshipError::TeamMismatch { .. })
    ));
    season.enroll(23, &chassis("Mercedes", 3), &belgian).unwrap();
}

#[test]
fn test_free_agents_and_expiry() {
    let mut season = season();
    season.finalize_contract(2, date("2024-08-31")).unwrap();

    let free: Vec<u32> = season
        .free_agents(date("2024-09-01"))
        .iter()
        .map(|d| d.race_number)
        .collect();
    assert_eq!(free, vec![2]);
    assert!(season.free_agents(date("2024-08-31")).is_empty());

    let contract = season.contract_history(2)[0].clone();
    assert!(!season.is_vigent(&contract, date("2024-09-01")));
    assert!(season.is_vigent(&season.contract_history(44)[0].clone(), date("2099-01-01")));
}

#[test]
fn test_recompute_rosters_repairs_drift() {
    let mut season = season();
    assert!(season.detach_driver("McLaren", 81).unwrap());
    assert!(!season.team("McLaren").unwrap().drivers.contains(&81));

    season.recompute_team_rosters(date("2024-06-01"));
    let mclaren = &season.team("McLaren").unwrap().drivers;
    assert!(mclaren.contains(&81));
    assert!(mclaren.contains(&4));

    // Expired contracts drop out of the rebuilt roster.
    season.finalize_contract(81, date("2024-06-30")).unwrap();
    season.recompute_team_rosters(date("2024-07-01"));
    assert!(!season.team("McLaren").unwrap().drivers.contains(&81));
    assert_eq!(season.team("Mercedes").unwrap().drivers.len(), 2);
}

#[test]
fn test_contract_requires_known_parties() {
    let mut season = season();
    assert!(matches!(
        season.assign_contract(99, "Mercedes", date("2024-01-01"), None),
        Err(ChampionshipError::NotFound { .. })
    ));
    assert!(matches!(
        season.assign_contract(44, "Haas", date("2024-01-01"), None),
        Err(ChampionshipError::NotFound { .. })
    ));
    assert!(matches!(
        season.finalize_contract(44, date("2023-06-01")),
        Err(ChampionshipError::InvalidDateRange { .. })
    ));
}
