pub mod contracts;
pub mod races;
pub mod registry;
pub mod reports;
pub mod scoring;
pub mod season;
pub mod shared;

pub use crate::domain::model::{DriverTeamContract, GrandPrix, Participation, RaceId};
pub use crate::utils::error::Result;
