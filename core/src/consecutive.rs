//! Consecutive-shift resolver.
//!
//! Runs after a shift is selected and before it is committed, when the
//! top requester asked for consecutive shifts. It never mutates the run:
//! it returns a decision that the phase driver dispatches.

use crate::{
    context::RunContext,
    individual::{ConsecutiveNeed, RestClass},
    shift::ShiftKind,
    types::{IndividualIdx, ShiftIdx},
};

/// Companion offsets relative to the selected shift, by shift kind.
/// Long rest uses the first 4, short rest 5, short-rest day shifts 6.
const CANDIDATE_OFFSETS: [[isize; 6]; 3] = [
    [-3, 3, 4, 5, -2, 0],  // night
    [-3, 3, -4, 4, -2, 2], // day
    [-3, 3, -4, -5, 2, 0], // swing
];

fn candidate_offsets(kind: ShiftKind, rest: RestClass) -> &'static [isize] {
    let row = match kind {
        ShiftKind::Night => &CANDIDATE_OFFSETS[0],
        ShiftKind::Day => &CANDIDATE_OFFSETS[1],
        ShiftKind::Swing => &CANDIDATE_OFFSETS[2],
    };
    let n = match (rest, kind) {
        (RestClass::Long, _) => 4,
        (RestClass::Short, ShiftKind::Day) => 6,
        (RestClass::Short, _) => 5,
    };
    &row[..n]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsecutiveDecision {
    /// The requester did not ask for consecutive shifts.
    NotRequested,
    /// Commit the selected shift alone.
    Proceed,
    /// Commit an open requested neighbour, then the selected shift.
    Companion { companion: ShiftIdx },
    /// Move `occupant` from `freed` to `landing`, give `freed` to the
    /// requester, then commit the selected shift.
    Trade { freed: ShiftIdx, landing: ShiftIdx, occupant: IndividualIdx },
    /// Strict requester, nothing found: withdraw the preference and
    /// leave the selected shift open.
    Recycle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsecutiveCandidate {
    pub shift:     ShiftIdx,
    pub requested: bool,
    pub open:      bool,
    pub occupant:  Option<IndividualIdx>,
    /// Where the occupant would move to free this shift.
    pub landing:   Option<ShiftIdx>,
}

/// Ephemeral per-attempt view of the companion candidates.
#[derive(Debug, Clone, Default)]
pub struct ConsecutiveWorkspace {
    pub candidates: Vec<ConsecutiveCandidate>,
}

impl ConsecutiveWorkspace {
    /// Gather in-range candidates for `requester` around `selected`.
    ///
    /// `no_multi_point` drops candidates worth more than one point.
    /// Candidates that would push a no-overage requester past their
    /// request are dropped too.
    pub fn build(
        ctx: &RunContext,
        selected: ShiftIdx,
        requester: IndividualIdx,
        no_multi_point: bool,
    ) -> Self {
        let ind = &ctx.individuals[requester];
        let sel = &ctx.shifts[selected];
        let room = ind.remaining() - sel.points;
        let mut candidates = Vec::new();

        for &offset in candidate_offsets(sel.kind, ind.rest) {
            let Some(cand) = selected.checked_add_signed(offset) else { continue };
            if cand == selected || cand >= ctx.shifts.len() {
                continue;
            }
            let shift = &ctx.shifts[cand];
            if !shift.is_real() || (no_multi_point && shift.points > 1) {
                continue;
            }
            if room - shift.points < 0 && !ind.overage.allows_overage() {
                continue;
            }

            let mut candidate = ConsecutiveCandidate {
                shift:     cand,
                requested: ind.active[cand],
                open:      shift.is_open(),
                occupant:  shift.assignee,
                landing:   None,
            };
            // Trades are attempted only in LoP-1, and never displace a
            // strict consecutive occupant.
            if let Some(occ) = shift.assignee {
                let movable = occ != requester
                    && ctx.individuals[occ].consecutive != ConsecutiveNeed::Strict;
                if ctx.phase.is_first() && movable {
                    candidate.landing = find_trade_target(ctx, selected, cand, occ);
                }
            }
            candidates.push(candidate);
        }
        Self { candidates }
    }

    pub fn decide(&self) -> Option<ConsecutiveDecision> {
        if let Some(c) = self.candidates.iter().find(|c| c.open && c.requested) {
            return Some(ConsecutiveDecision::Companion { companion: c.shift });
        }
        self.candidates
            .iter()
            .filter(|c| c.requested)
            .find_map(|c| match (c.occupant, c.landing) {
                (Some(occupant), Some(landing)) => Some(ConsecutiveDecision::Trade {
                    freed: c.shift,
                    landing,
                    occupant,
                }),
                _ => None,
            })
    }
}

/// Open shift of the same kind and points as `occupied` that `occupant`
/// requested and can hold under their own spacing rule. Fewest qualified
/// requesters wins, then the earliest.
pub fn find_trade_target(
    ctx: &RunContext,
    selected: ShiftIdx,
    occupied: ShiftIdx,
    occupant: IndividualIdx,
) -> Option<ShiftIdx> {
    let occ = &ctx.individuals[occupant];
    let target = &ctx.shifts[occupied];
    ctx.shifts
        .iter()
        .enumerate()
        .filter(|&(t, s)| {
            t != selected
                && s.is_open()
                && s.kind == target.kind
                && s.points == target.points
                && occ.active[t]
                && occ.spacing.permits(t, &occ.assigned)
        })
        .min_by_key(|&(t, s)| (s.qualified.len(), t))
        .map(|(t, _)| t)
}

/// Decide how to honour the top requester's consecutive need for
/// `selected`.
pub fn resolve_consecutive(
    ctx: &RunContext,
    selected: ShiftIdx,
    requester: IndividualIdx,
) -> ConsecutiveDecision {
    let ind = &ctx.individuals[requester];
    if !ind.consecutive.is_declared() {
        return ConsecutiveDecision::NotRequested;
    }
    let points = ctx.shifts[selected].points;
    let inst = &ctx.institutions[ind.home];

    if ind.points_assigned + points >= ind.request {
        log::debug!("shifter {requester}: shift {selected} alone meets the request");
        return ConsecutiveDecision::Proceed;
    }
    if inst.points_assigned + points >= inst.quota {
        log::debug!("shifter {requester}: shift {selected} alone meets {}'s quota", inst.name);
        return ConsecutiveDecision::Proceed;
    }

    // Scoped to this attempt, LoP-1 only.
    let no_multi_point =
        ctx.phase.is_first() && inst.points_assigned + points == inst.quota - 1;

    let workspace = ConsecutiveWorkspace::build(ctx, selected, requester, no_multi_point);
    match workspace.decide() {
        Some(decision) => decision,
        None if ind.consecutive == ConsecutiveNeed::NotStrict => ConsecutiveDecision::Proceed,
        None => ConsecutiveDecision::Recycle,
    }
}
