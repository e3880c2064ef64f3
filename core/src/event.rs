//! The run's event log.
//!
//! RULE: Every state change the engine makes is recorded here, in the
//! order it happens. Two runs with the same seed and records must
//! produce identical logs.

use crate::types::{IndividualIdx, InstitutionIdx, Phase, Points, ShiftIdx};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitKind {
    /// The shift picked by the round selector.
    Direct,
    /// A companion committed alongside the selected shift.
    ConsecutiveCompanion,
    /// An occupant moved to a new shift to free a companion.
    TradeLanding { vacated: ShiftIdx },
}

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllocEvent {
    RunInitialized {
        seed: u64,
        individuals: usize,
        shifts: usize,
    },
    ShiftAssigned {
        phase: Phase,
        shift: ShiftIdx,
        individual: IndividualIdx,
        kind: CommitKind,
        qualified: usize,
        points_assigned: Points,
        request: Points,
    },
    ShiftTraded {
        occupant: IndividualIdx,
        from: ShiftIdx,
        to: ShiftIdx,
    },
    ShiftRecycled {
        shift: ShiftIdx,
        individual: IndividualIdx,
    },
    QuotaReached {
        institution: InstitutionIdx,
        deficit: Points,
    },
    InstitutionCautioned {
        institution: InstitutionIdx,
    },
    PhaseSwitched {
        phase: Phase,
    },
    ShiftDonated {
        shift: ShiftIdx,
        donor: IndividualIdx,
        receiver: IndividualIdx,
    },
}

impl fmt::Display for AllocEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunInitialized { seed, individuals, shifts } => {
                write!(f, "run seed={seed}: {individuals} shifters, {shifts} shifts")
            }
            Self::ShiftAssigned { phase, shift, individual, kind, qualified, points_assigned, request } => write!(
                f,
                "{} shift {shift} -> shifter {individual} ({kind:?}, {qualified} qualified); \
                 {points_assigned} of {request} points",
                phase.name()
            ),
            Self::ShiftTraded { occupant, from, to } => {
                write!(f, "shifter {occupant} traded shift {from} for shift {to}")
            }
            Self::ShiftRecycled { shift, individual } => write!(
                f,
                "no consecutive shift for shifter {individual}; shift {shift} recycled"
            ),
            Self::QuotaReached { institution, deficit } => {
                write!(f, "institution {institution} reached quota (deficit {deficit})")
            }
            Self::InstitutionCautioned { institution } => {
                write!(f, "institution {institution} cautioned")
            }
            Self::PhaseSwitched { phase } => write!(f, "switching to {}", phase.name()),
            Self::ShiftDonated { shift, donor, receiver } => {
                write!(f, "shifter {donor} donated shift {shift} to shifter {receiver}")
            }
        }
    }
}
