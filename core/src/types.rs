//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// Position of a shift in the calendar. Distances between shifts are
/// measured in index steps, never in dates.
pub type ShiftIdx = usize;

/// Position of an individual in questionnaire order.
pub type IndividualIdx = usize;

/// Position of an institution in roster order (0-based).
pub type InstitutionIdx = usize;

/// Shift points. Signed because deficits and surpluses are derived from it.
pub type Points = i32;

/// Which preference list is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Phase-1 preferences only; trades and multi-point caution apply.
    First,
    /// Phase-2 (superset) preferences.
    Second,
}

impl Phase {
    pub fn is_first(self) -> bool {
        self == Phase::First
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::First => "LoP-1",
            Phase::Second => "LoP-2",
        }
    }
}
