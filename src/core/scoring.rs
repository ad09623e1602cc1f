//! Points awarded per finishing position.
//!
//! Every call site that needs points, finalization and recomputation alike, goes
//! through [`awarded_points`] so stored and recomputed values always agree.

use crate::domain::model::Participation;

pub const POINTS_TABLE: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

pub const FASTEST_LAP_BONUS: u32 = 1;

pub fn points_for_position(position: u32) -> u32 {
    match position {
        1..=10 => POINTS_TABLE[(position - 1) as usize],
        _ => 0,
    }
}

pub fn awarded_points(position: u32, fastest_lap: bool, dnf: bool) -> u32 {
    if dnf {
        return 0;
    }
    let bonus = if fastest_lap && (1..=10).contains(&position) {
        FASTEST_LAP_BONUS
    } else {
        0
    };
    points_for_position(position) + bonus
}

pub fn participation_points(participation: &Participation) -> u32 {
    awarded_points(
        participation.final_position,
        participation.fastest_lap,
        participation.dnf,
    )
}
