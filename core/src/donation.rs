//! Donation rebalancer.
//!
//! Runs once after both phases. Shifts held by members of over-quota
//! institutions are handed to qualifying members of under-quota ones,
//! one transfer at a time, as long as each transfer strictly lowers the
//! combined absolute deficit of the two institutions involved.

use crate::{
    commit::propagate_quota,
    config::EngineConfig,
    context::RunContext,
    event::AllocEvent,
    individual::ConsecutiveNeed,
    types::{IndividualIdx, Points, ShiftIdx},
};

/// Window inside which a strict requester's shifts count as a pair.
pub const CONSECUTIVE_PAIR_WINDOW: usize = 6;

/// Rate every assigned shift as a donor.
///
/// priority = 10 × institution surplus + holder's own surplus. Shifts of
/// institutions at or under quota, and shifts that are half of a strict
/// requester's consecutive pair, get 0.
pub fn find_donors(ctx: &mut RunContext) {
    for s in 0..ctx.shifts.len() {
        ctx.shifts[s].donation_priority = 0;
        let Some(holder) = ctx.shifts[s].assignee else { continue };
        let ind = &ctx.individuals[holder];
        let surplus = ctx.institutions[ind.home].surplus();
        if surplus <= 0 {
            continue;
        }
        if ind.consecutive == ConsecutiveNeed::Strict {
            let paired = ind.assigned.iter().any(|&a| {
                let d = a.abs_diff(s);
                d != 0 && d <= CONSECUTIVE_PAIR_WINDOW
            });
            if paired {
                continue;
            }
        }
        ctx.shifts[s].donation_priority = 10 * surplus + (ind.points_assigned - ind.request);
    }
}

/// Highest-priority donor shift, earliest on ties. Its priority is
/// zeroed so it is not picked again before the next refresh.
pub fn find_next_donor(ctx: &mut RunContext) -> Option<ShiftIdx> {
    let mut best: Option<(ShiftIdx, Points)> = None;
    for (s, shift) in ctx.shifts.iter().enumerate() {
        let p = shift.donation_priority;
        if p > 0 && best.map_or(true, |(_, bp)| p > bp) {
            best = Some((s, p));
        }
    }
    let (s, _) = best?;
    ctx.shifts[s].donation_priority = 0;
    Some(s)
}

/// Best receiver for a donor shift, if any.
///
/// A receiver prefers the shift in the active list, still needs points,
/// fits the shift unless overage is allowed, can hold it under their
/// spacing rule, and belongs to an institution strictly under quota.
/// The transfer must strictly reduce |donor deficit| + |receiver deficit|.
///
/// priority = 10 × receiver institution deficit + own remaining request
///            − 2 × shifts already held.
pub fn find_receiver(ctx: &RunContext, shift: ShiftIdx) -> Option<IndividualIdx> {
    let donor = ctx.shifts[shift].assignee?;
    let points = ctx.shifts[shift].points;
    let donor_deficit = ctx.institutions[ctx.home_of(donor)].deficit();

    let mut best: Option<(IndividualIdx, Points)> = None;
    for (i, ind) in ctx.individuals.iter().enumerate() {
        if !ind.active[shift] || ind.remaining() <= 0 || !ind.can_cover(points) {
            continue;
        }
        let recv_deficit = ctx.institutions[ind.home].deficit();
        if recv_deficit <= 0 {
            continue;
        }
        let before = recv_deficit.abs() + donor_deficit.abs();
        let after = (recv_deficit - points).abs() + (donor_deficit + points).abs();
        if after >= before {
            continue;
        }
        if !ind.spacing.permits(shift, &ind.assigned) {
            continue;
        }
        let priority = 10 * recv_deficit + ind.remaining() - 2 * ind.assigned.len() as Points;
        if best.map_or(true, |(_, bp)| priority > bp) {
            best = Some((i, priority));
        }
    }
    best.map(|(i, _)| i)
}

/// Move `shift` from its holder to `receiver` in one step, propagate
/// both institutions' quota state and refresh the donor ratings.
pub fn assign_donor_shift(
    ctx: &mut RunContext,
    config: &EngineConfig,
    shift: ShiftIdx,
    receiver: IndividualIdx,
) {
    let Some(donor) = ctx.shifts[shift].assignee else {
        log::warn!("donor shift {shift} is open; nothing to transfer");
        return;
    };
    let points = ctx.shifts[shift].points;
    let donor_home = ctx.home_of(donor);
    let receiver_home = ctx.home_of(receiver);

    ctx.shifts[shift].assignee = Some(receiver);

    ctx.individuals[receiver].take(shift, points);
    ctx.institutions[receiver_home].points_assigned += points;
    propagate_quota(ctx, config, receiver_home);

    if !ctx.individuals[donor].release(shift, points) {
        log::warn!("shifter {donor} held shift {shift} without listing it");
    }
    ctx.institutions[donor_home].points_assigned -= points;
    propagate_quota(ctx, config, donor_home);

    ctx.record(AllocEvent::ShiftDonated { shift, donor, receiver });
    find_donors(ctx);
}

/// Donate until no donor shift with priority > 0 remains. Returns the
/// number of transfers made.
pub fn rebalance(ctx: &mut RunContext, config: &EngineConfig) -> usize {
    let mut transfers = 0;
    find_donors(ctx);
    while let Some(shift) = find_next_donor(ctx) {
        match find_receiver(ctx, shift) {
            Some(receiver) => {
                assign_donor_shift(ctx, config, shift, receiver);
                transfers += 1;
            }
            None => log::debug!("no receiver for donor shift {shift}"),
        }
    }
    log::debug!("donation finished after {transfers} transfers");
    transfers
}
