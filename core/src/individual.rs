//! Requesters and their questionnaire-derived constraints.

use crate::types::{InstitutionIdx, Points, ShiftIdx};
use serde::{Deserialize, Serialize};

/// Special-priority tier, keyed by its one-letter override code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityTier {
    Normal,
    Low,
    Medium,
    High,
    Extraordinary,
}

impl PriorityTier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().chars().next()? {
            'N' => Some(Self::Normal),
            'L' => Some(Self::Low),
            'M' => Some(Self::Medium),
            'H' => Some(Self::High),
            'X' => Some(Self::Extraordinary),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Normal => 'N',
            Self::Low => 'L',
            Self::Medium => 'M',
            Self::High => 'H',
            Self::Extraordinary => 'X',
        }
    }

    pub fn base_priority(self) -> f64 {
        match self {
            Self::Normal => 1.0,        // no special priority
            Self::Low => 1.5,           // teaching one term
            Self::Medium => 2.0,        // one month free
            Self::High => 2.5,          // teaching two terms
            Self::Extraordinary => 3.0, // needs specific shifts
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OveragePolicy {
    RejectOverage,
    AllowOverage,
}

impl OveragePolicy {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::RejectOverage),
            2 => Some(Self::AllowOverage),
            _ => None,
        }
    }

    pub fn allows_overage(self) -> bool {
        self == Self::AllowOverage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsecutiveNeed {
    None,
    /// Take the shift anyway when no companion is found.
    NotStrict,
    /// Abandon the shift when no companion is found.
    Strict,
}

impl ConsecutiveNeed {
    /// Combine the "needs consecutive" answer (1 yes, 2 no) with the
    /// strictness answer (1 not strict, 2 strict).
    pub fn from_codes(consecutive: i64, strict: i64) -> Option<Self> {
        match (consecutive, strict) {
            (2, _) => Some(Self::None),
            (1, 1) => Some(Self::NotStrict),
            (1, 2) => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn is_declared(self) -> bool {
        self != Self::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestClass {
    /// Eight hours between consecutive shifts is enough.
    Short,
    /// Sixteen hours required.
    Long,
}

impl RestClass {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Short),
            2 => Some(Self::Long),
            _ => None,
        }
    }
}

/// Minimum index distance between any two assigned shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingClass {
    NoBreak,
    OneShift,
    OneWeek,
    MoreThanWeek,
}

impl SpacingClass {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::NoBreak),
            2 => Some(Self::OneShift),
            3 => Some(Self::OneWeek),
            4 => Some(Self::MoreThanWeek),
            _ => None,
        }
    }

    pub fn min_distance(self) -> usize {
        match self {
            Self::NoBreak => 3,
            Self::OneShift => 6,
            Self::OneWeek => 9,
            Self::MoreThanWeek => 15,
        }
    }

    /// True when `candidate` is at least the minimum distance from every
    /// shift in `assigned`.
    pub fn permits(self, candidate: ShiftIdx, assigned: &[ShiftIdx]) -> bool {
        let min = self.min_distance();
        assigned.iter().all(|&a| a.abs_diff(candidate) >= min)
    }
}

/// The four priority components and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub base:   f64,
    pub virgin: f64,
    pub bonus:  f64,
    pub random: f64,
    total:      f64,
}

impl Priority {
    pub fn new(base: f64, virgin: f64, random: f64) -> Self {
        let mut p = Self { base, virgin, bonus: 0.0, random, total: 0.0 };
        p.refresh_total();
        p
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Must be called after any component changes.
    pub fn refresh_total(&mut self) {
        self.total = self.base + self.virgin + self.bonus + self.random;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub name:          String,
    pub id:            String,
    pub email:         String,
    pub home:          InstitutionIdx,
    pub request:       Points,
    pub overage:       OveragePolicy,
    pub consecutive:   ConsecutiveNeed,
    pub rest:          RestClass,
    pub spacing:       SpacingClass,
    pub special:       bool,
    pub justification: String,
    pub lop1:          Vec<bool>,
    /// Always a superset of `lop1`.
    pub lop2:          Vec<bool>,
    /// The preference list of the current phase.
    pub active:        Vec<bool>,
    pub priority:      Priority,
    pub points_assigned: Points,
    /// Assigned shifts in assignment order.
    pub assigned:      Vec<ShiftIdx>,
    pub open:          bool,
    pub caution:       bool,
}

impl Individual {
    pub fn remaining(&self) -> Points {
        self.request - self.points_assigned
    }

    /// Whether a shift worth `points` fits the remaining request.
    pub fn can_cover(&self, points: Points) -> bool {
        self.remaining() - points >= 0 || self.overage.allows_overage()
    }

    pub fn lop1_count(&self) -> usize {
        self.lop1.iter().filter(|&&r| r).count()
    }

    pub fn lop2_count(&self) -> usize {
        self.lop2.iter().filter(|&&r| r).count()
    }

    /// Record a newly assigned shift and close the individual once met.
    pub fn take(&mut self, shift: ShiftIdx, points: Points) {
        self.points_assigned += points;
        self.assigned.push(shift);
        if self.points_assigned >= self.request {
            self.open = false;
        }
    }

    /// Remove a shift from the assigned list, compacting it.
    /// Returns false if the shift was not held.
    pub fn release(&mut self, shift: ShiftIdx, points: Points) -> bool {
        match self.assigned.iter().position(|&s| s == shift) {
            Some(slot) => {
                self.assigned.remove(slot);
                self.points_assigned -= points;
                self.open = self.points_assigned < self.request;
                true
            }
            None => false,
        }
    }

    /// Rewrite the slot holding `from` to hold `to`, keeping its position.
    pub fn relabel(&mut self, from: ShiftIdx, to: ShiftIdx) -> bool {
        match self.assigned.iter_mut().find(|s| **s == from) {
            Some(slot) => {
                *slot = to;
                true
            }
            None => false,
        }
    }
}
