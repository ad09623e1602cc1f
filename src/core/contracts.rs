use crate::domain::model::{Driver, DriverTeamContract};
use crate::utils::error::{ChampionshipError, Result};
use chrono::NaiveDate;

pub fn is_vigent(contract: &DriverTeamContract, today: NaiveDate) -> bool {
    contract.is_vigent(today)
}

/// Append-only history of driver/team affiliations.
#[derive(Debug, Clone, Default)]
pub struct ContractLedger {
    contracts: Vec<DriverTeamContract>,
}

impl ContractLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contracts(&self) -> &[DriverTeamContract] {
        &self.contracts
    }

    /// Oldest first; contracts starting the same day keep their signing order.
    pub fn history(&self, driver: u32) -> Vec<&DriverTeamContract> {
        let mut history: Vec<_> = self.contracts.iter().filter(|c| c.driver == driver).collect();
        history.sort_by_key(|c| c.start_date);
        history
    }

    pub fn current_contract(&self, driver: u32, as_of: NaiveDate) -> Option<&DriverTeamContract> {
        self.contracts
            .iter()
            .filter(|c| c.driver == driver && c.covers(as_of))
            .max_by_key(|c| c.start_date)
    }

    pub fn current_team(&self, driver: u32, as_of: NaiveDate) -> Option<&str> {
        self.current_contract(driver, as_of).map(|c| c.team.as_str())
    }

    pub fn free_agents<'a>(&self, drivers: &'a [Driver], today: NaiveDate) -> Vec<&'a Driver> {
        drivers
            .iter()
            .filter(|d| self.current_contract(d.race_number, today).is_none())
            .collect()
    }

    pub fn has_driver(&self, driver: u32) -> bool {
        self.contracts.iter().any(|c| c.driver == driver)
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.contracts.iter().any(|c| c.team == team)
    }

    pub(crate) fn covering(&self, today: NaiveDate) -> impl Iterator<Item = &DriverTeamContract> {
        self.contracts.iter().filter(move |c| c.covers(today))
    }

    /// A driver holds at most one contract for any given day, whatever the team.
    pub(crate) fn check_assign(
        &self,
        driver: u32,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Result<()> {
        if let Some(to) = to {
            if to < from {
                return Err(ChampionshipError::InvalidDateRange {
                    reason: format!("contract ends on {} before it starts on {}", to, from),
                });
            }
        }

        if let Some(existing) = self
            .contracts
            .iter()
            .find(|c| c.driver == driver && c.overlaps(from, to))
        {
            let until = existing
                .end_date
                .map_or_else(|| "open-ended".to_string(), |end| format!("until {}", end));
            return Err(ChampionshipError::ContractConflict {
                driver,
                reason: format!(
                    "already signed with '{}' from {} ({}); finalize that contract first",
                    existing.team, existing.start_date, until
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, contract: DriverTeamContract) {
        self.contracts.push(contract);
    }

    /// Picks the contract still running on `end_date`, preferring the latest signed.
    fn closable_index(&self, driver: u32, end_date: NaiveDate) -> Result<usize> {
        let running: Vec<usize> = self
            .contracts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.driver == driver && c.is_vigent(end_date))
            .map(|(i, _)| i)
            .collect();
        if running.is_empty() {
            return Err(ChampionshipError::NoActiveContract { driver });
        }

        running
            .iter()
            .copied()
            .filter(|&i| self.contracts[i].start_date <= end_date)
            .max_by_key(|&i| self.contracts[i].start_date)
            .ok_or_else(|| ChampionshipError::InvalidDateRange {
                reason: format!(
                    "end date {} precedes the start of every open contract of driver #{}",
                    end_date, driver
                ),
            })
    }

    pub(crate) fn check_close(&self, driver: u32, end_date: NaiveDate) -> Result<&DriverTeamContract> {
        self.closable_index(driver, end_date).map(|i| &self.contracts[i])
    }

    pub(crate) fn close(&mut self, driver: u32, end_date: NaiveDate) -> Result<DriverTeamContract> {
        let index = self.closable_index(driver, end_date)?;
        let contract = &mut self.contracts[index];
        contract.end_date = Some(end_date);
        Ok(contract.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn signed(ledger: &mut ContractLedger, driver: u32, team: &str, from: &str, to: Option<&str>) {
        let (from, to) = (date(from), to.map(date));
        ledger.check_assign(driver, from, to).unwrap();
        ledger.push(DriverTeamContract {
            start_date: from,
            end_date: to,
            driver,
            team: team.to_string(),
        });
    }

    #[test]
    fn test_is_vigent_uses_supplied_date() {
        let contract = DriverTeamContract {
            start_date: date("2023-01-01"),
            end_date: Some(date("2025-01-01")),
            driver: 44,
            team: "Mercedes".to_string(),
        };
        assert!(!is_vigent(&contract, date("2025-06-01")));
        assert!(is_vigent(&contract, date("2024-06-01")));

        let open = DriverTeamContract {
            end_date: None,
            ..contract
        };
        assert!(is_vigent(&open, date("2100-01-01")));
    }

    #[test]
    fn test_current_team_follows_history() {
        let mut ledger = ContractLedger::new();
        signed(&mut ledger, 44, "Mercedes", "2013-01-01", Some("2024-12-31"));
        signed(&mut ledger, 44, "Ferrari", "2025-01-01", None);

        assert_eq!(ledger.current_team(44, date("2020-05-01")), Some("Mercedes"));
        assert_eq!(ledger.current_team(44, date("2025-03-01")), Some("Ferrari"));
        assert_eq!(ledger.current_team(44, date("2012-03-01")), None);
    }

    #[test]
    fn test_overlapping_contract_conflicts() {
        let mut ledger = ContractLedger::new();
        signed(&mut ledger, 16, "Ferrari", "2019-01-01", None);

        let err = ledger
            .check_assign(16, date("2026-01-01"), None)
            .unwrap_err();
        assert!(matches!(err, ChampionshipError::ContractConflict { driver: 16, .. }));
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let ledger = ContractLedger::new();
        let err = ledger
            .check_assign(1, date("2024-01-01"), Some(date("2023-01-01")))
            .unwrap_err();
        assert!(matches!(err, ChampionshipError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_close_then_sign_elsewhere() {
        let mut ledger = ContractLedger::new();
        signed(&mut ledger, 55, "Williams", "2022-01-01", None);
        let closed = ledger.close(55, date("2024-12-31")).unwrap();
        assert_eq!(closed.end_date, Some(date("2024-12-31")));

        signed(&mut ledger, 55, "Sauber", "2025-01-01", None);
        let history = ledger.history(55);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].team, "Williams");
        assert_eq!(history[1].team, "Sauber");
    }

    #[test]
    fn test_close_without_open_contract() {
        let mut ledger = ContractLedger::new();
        assert!(matches!(
            ledger.close(3, date("2024-01-01")),
            Err(ChampionshipError::NoActiveContract { driver: 3 })
        ));

        signed(&mut ledger, 3, "RB", "2024-06-01", None);
        assert!(matches!(
            ledger.close(3, date("2024-01-01")),
            Err(ChampionshipError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_free_agents() {
        let driver = |n: u32| Driver {
            dni: format!("D{}", n),
            name: "N".to_string(),
            surname: "S".to_string(),
            age: 25,
            nationality: "GBR".to_string(),
            race_number: n,
            experience_years: 3,
            total_points: 0,
        };
        let drivers = vec![driver(4), driver(81), driver(87)];

        let mut ledger = ContractLedger::new();
        signed(&mut ledger, 4, "McLaren", "2019-01-01", None);
        signed(&mut ledger, 81, "McLaren", "2023-01-01", Some("2024-12-31"));

        let free: Vec<u32> = ledger
            .free_agents(&drivers, date("2025-02-01"))
            .iter()
            .map(|d| d.race_number)
            .collect();
        assert_eq!(free, vec![81, 87]);
    }
}
