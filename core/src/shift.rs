use crate::types::{IndividualIdx, Points};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    Night,
    Day,
    Swing,
}

impl ShiftKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Night),
            1 => Some(Self::Day),
            2 => Some(Self::Swing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub date:        String,
    pub label:       String,
    pub kind:        ShiftKind,
    /// Zero-point entries are calendar placeholders and are never filled.
    pub points:      Points,
    pub export_type: String,
    pub export_date: String,
    pub assignee:    Option<IndividualIdx>,

    // Per-round transient state, rebuilt by prepare_shifts.
    pub qualified:     Vec<IndividualIdx>,
    pub top_requester: Option<IndividualIdx>,
    /// Only meaningful during donation.
    pub donation_priority: Points,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.assignee.is_none()
    }

    pub fn is_real(&self) -> bool {
        self.points > 0
    }
}
