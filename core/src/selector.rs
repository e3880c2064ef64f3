//! Qualification and round selection.

use crate::{
    config::EngineConfig,
    context::RunContext,
    types::{IndividualIdx, ShiftIdx},
};

/// Whether `individual` may take `shift` this round.
///
/// All must hold: the shift is in the active preference list; the
/// individual still needs points and the shift fits them unless overage
/// is allowed; in LoP-1 the base priority is positive and a cautioned
/// individual is not offered a shift above the caution threshold; and
/// no assigned shift is closer than the individual's spacing minimum.
pub fn is_qualified(
    ctx: &RunContext,
    config: &EngineConfig,
    individual: IndividualIdx,
    shift: ShiftIdx,
) -> bool {
    let ind = &ctx.individuals[individual];
    let points = ctx.shifts[shift].points;
    let first = ctx.phase.is_first();

    if !ind.active[shift] {
        return false;
    }
    if ind.remaining() <= 0 || !ind.can_cover(points) {
        return false;
    }
    if first && ind.priority.base <= 0.0 {
        return false;
    }
    if first && ind.caution && points > config.caution_point_threshold {
        return false;
    }
    ind.spacing.permits(shift, &ind.assigned)
}

/// Rebuild every open shift's qualified list and top requester.
/// Qualification depends on the previous round, so call once per round.
pub fn prepare_shifts(ctx: &mut RunContext, config: &EngineConfig) {
    for s in 0..ctx.shifts.len() {
        if !ctx.shifts[s].is_open() {
            continue;
        }
        let mut qualified = Vec::new();
        let mut top: Option<(IndividualIdx, f64)> = None;
        if ctx.shifts[s].is_real() {
            for i in 0..ctx.individuals.len() {
                if !is_qualified(ctx, config, i, s) {
                    continue;
                }
                qualified.push(i);
                let total = ctx.individuals[i].priority.total();
                // Strict comparison: the first individual reaching the
                // maximum keeps it.
                if top.map_or(true, |(_, best)| total > best) {
                    top = Some((i, total));
                }
            }
        }
        let shift = &mut ctx.shifts[s];
        shift.qualified = qualified;
        shift.top_requester = top.map(|(i, _)| i);
    }
}

/// The open shift with the fewest qualified requesters, earliest first.
/// None ends the phase.
pub fn find_next_shift(ctx: &RunContext) -> Option<ShiftIdx> {
    ctx.shifts
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_open() && !s.qualified.is_empty())
        .min_by_key(|(i, s)| (s.qualified.len(), *i))
        .map(|(i, _)| i)
}

/// Directed shifts first, in list order, then the heuristic.
pub fn select_shift(ctx: &RunContext, config: &EngineConfig) -> Option<ShiftIdx> {
    config
        .directed_shifts
        .iter()
        .copied()
        .find(|&d| {
            ctx.shifts
                .get(d)
                .is_some_and(|s| s.is_open() && s.top_requester.is_some())
        })
        .or_else(|| find_next_shift(ctx))
}
