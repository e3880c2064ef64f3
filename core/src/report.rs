//! Final tables of a run.
//!
//! Builders here are pure: they read a finished context and return data
//! or text. Writing files is the caller's business.

use serde::Serialize;
use std::fmt::Write as _;

use crate::{
    context::RunContext,
    metrics::ImbalanceMetric,
    types::{IndividualIdx, InstitutionIdx, Points, ShiftIdx},
};

/// Location column of every export row.
pub const EXPORT_LOCATION: &str = "Control Room";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftRecord {
    pub index:       ShiftIdx,
    pub date:        String,
    pub label:       String,
    pub points:      Points,
    pub assignee:    Option<IndividualIdx>,
    pub export_type: String,
    pub export_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShifterRecord {
    pub name:            String,
    pub id:              String,
    pub home:            InstitutionIdx,
    pub requested:       Points,
    pub points_assigned: Points,
    pub shifts:          Vec<ShiftIdx>,
    pub lop1_requests:   usize,
    pub lop2_requests:   usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionRecord {
    pub name:             String,
    pub points_requested: Points,
    pub quota:            Points,
    pub points_assigned:  Points,
}

impl InstitutionRecord {
    /// assigned − quota, as printed in the institution table.
    pub fn difference(&self) -> Points {
        self.points_assigned - self.quota
    }
}

/// One line of the scheduling-system import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub id:          String,
    pub export_type: String,
    pub location:    String,
    pub export_date: String,
}

/// Everything the presenter needs after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationOutcome {
    pub seed:         u64,
    pub metric:       ImbalanceMetric,
    pub shifts:       Vec<ShiftRecord>,
    pub shifters:     Vec<ShifterRecord>,
    pub institutions: Vec<InstitutionRecord>,
}

impl AllocationOutcome {
    pub fn from_context(ctx: &RunContext, seed: u64) -> Self {
        let shifts = ctx
            .shifts
            .iter()
            .enumerate()
            .map(|(index, s)| ShiftRecord {
                index,
                date:        s.date.clone(),
                label:       s.label.clone(),
                points:      s.points,
                assignee:    s.assignee,
                export_type: s.export_type.clone(),
                export_date: s.export_date.clone(),
            })
            .collect();
        let shifters = ctx
            .individuals
            .iter()
            .map(|ind| ShifterRecord {
                name:            ind.name.clone(),
                id:              ind.id.clone(),
                home:            ind.home,
                requested:       ind.request,
                points_assigned: ind.points_assigned,
                shifts:          ind.assigned.clone(),
                lop1_requests:   ind.lop1_count(),
                lop2_requests:   ind.lop2_count(),
            })
            .collect();
        let institutions = ctx
            .institutions
            .iter()
            .map(|inst| InstitutionRecord {
                name:             inst.name.clone(),
                points_requested: inst.points_requested,
                quota:            inst.quota,
                points_assigned:  inst.points_assigned,
            })
            .collect();
        Self { seed, metric: ImbalanceMetric::compute(ctx), shifts, shifters, institutions }
    }

    /// (filled, open) over real shifts. Placeholders count as neither.
    pub fn fill_counts(&self) -> (usize, usize) {
        let real = self.shifts.iter().filter(|s| s.points > 0);
        let filled = real.clone().filter(|s| s.assignee.is_some()).count();
        (filled, real.count() - filled)
    }

    pub fn shift_table(&self) -> String {
        let mut out = String::from("\nShift Table\n\n");
        for s in &self.shifts {
            match s.assignee {
                None => {
                    let _ = writeln!(out, "{:3} {:>6} {:>5}: Open", s.index, s.date, s.label);
                }
                Some(i) => {
                    let ind = &self.shifters[i];
                    let _ = writeln!(
                        out,
                        "{:3} {:>6} {:>5}: {:<25}{:<20}{:<15}",
                        s.index, s.date, s.label, ind.name, ind.id, self.institutions[ind.home].name
                    );
                }
            }
        }
        let (filled, open) = self.fill_counts();
        let _ = writeln!(out, "\nNumber of filled shifts = {filled}; number of open shifts = {open}");
        out
    }

    pub fn shifter_table(&self) -> String {
        let mut out = String::from("\nShifter Table\n\n");
        out.push_str("Fields are points requested, points assigned, shifts assigned,\n");
        out.push_str("shifts requested at LoP1, and shifts requested at LoP2\n");
        for ind in &self.shifters {
            let _ = writeln!(
                out,
                "{:<25}{:<15}{:3}{:3}{:3}{:5}{:5}",
                ind.name,
                self.institutions[ind.home].name,
                ind.requested,
                ind.points_assigned,
                ind.shifts.len(),
                ind.lop1_requests,
                ind.lop2_requests
            );
        }
        out
    }

    pub fn institution_table(&self) -> String {
        let mut out = String::from("\nInstitution Table\n\n");
        let _ = writeln!(out, "{:<15}{:>14}{:>7}{:>10}{:>11}", " ", "Points ", " ", "Points ", " ");
        let _ = writeln!(
            out,
            "{:<15}{:>14}{:>7}{:>10}{:>12}\n",
            "Institution", "Requested", "Quota", "Assigned", "  Difference"
        );
        for inst in &self.institutions {
            let _ = writeln!(
                out,
                "{:<15}{:>11}{:>8}{:>9}{:>10}",
                inst.name,
                inst.points_requested,
                inst.quota,
                inst.points_assigned,
                inst.difference()
            );
        }
        let _ = writeln!(
            out,
            "\nAbsolute points sum difference = {}\nChisq = {}\nIndChisq = {}",
            self.metric.open_deficit, self.metric.institution_chisq, self.metric.individual_chisq
        );
        out
    }

    /// One report per institution whose members asked for less than its
    /// quota, listing every member's request.
    pub fn deficiency_reports(&self) -> Vec<String> {
        self.institutions
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.points_requested < inst.quota)
            .map(|(h, inst)| {
                let mut out = format!(
                    "{:<14} has requested {} points for a quota of {} points\n\nCurrent requests:\n\n",
                    inst.name, inst.points_requested, inst.quota
                );
                for ind in self.shifters.iter().filter(|ind| ind.home == h) {
                    let _ = writeln!(out, "{:<25}{:5} points", ind.name, ind.requested);
                }
                out
            })
            .collect()
    }

    /// Import rows for every filled shift, in calendar order.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.shifts
            .iter()
            .filter_map(|s| {
                let ind = &self.shifters[s.assignee?];
                Some(ExportRow {
                    id:          ind.id.clone(),
                    export_type: s.export_type.clone(),
                    location:    EXPORT_LOCATION.to_string(),
                    export_date: s.export_date.clone(),
                })
            })
            .collect()
    }
}
