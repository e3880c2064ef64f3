//! Assignment committer: the only place a shift changes hands during
//! the assignment phases.

use crate::{
    config::EngineConfig,
    context::RunContext,
    event::{AllocEvent, CommitKind},
    types::{IndividualIdx, InstitutionIdx, ShiftIdx},
};

/// Record `shift` as held by `individual`.
///
/// Direct and companion commits add the shift's points to the individual
/// and the home institution, then propagate the institution's quota
/// state. A trade landing only relabels the occupant's vacated slot,
/// since both shifts carry the same points.
///
/// Afterwards every other qualified requester of the shift earns the
/// consolation bonus. A new holder has their bonus halved and their
/// virgin bonus consumed; a trading occupant is consoled instead when
/// they were among the landing shift's qualified requesters.
pub fn commit(
    ctx: &mut RunContext,
    config: &EngineConfig,
    shift: ShiftIdx,
    individual: IndividualIdx,
    kind: CommitKind,
) {
    let points = ctx.shifts[shift].points;
    ctx.shifts[shift].assignee = Some(individual);
    let home = ctx.home_of(individual);

    match kind {
        CommitKind::Direct | CommitKind::ConsecutiveCompanion => {
            ctx.institutions[home].points_assigned += points;
            ctx.individuals[individual].take(shift, points);
            propagate_quota(ctx, config, home);
        }
        CommitKind::TradeLanding { vacated } => {
            if !ctx.individuals[individual].relabel(vacated, shift) {
                log::warn!("shifter {individual} does not hold shift {vacated}; trade recorded anyway");
            }
            ctx.record(AllocEvent::ShiftTraded { occupant: individual, from: vacated, to: shift });
        }
    }

    let requesters = ctx.shifts[shift].qualified.clone();
    for &r in requesters.iter().filter(|&&r| r != individual) {
        let p = &mut ctx.individuals[r].priority;
        p.bonus += config.consolation_bonus;
        p.refresh_total();
    }
    let p = &mut ctx.individuals[individual].priority;
    match kind {
        CommitKind::TradeLanding { .. } => {
            if requesters.contains(&individual) {
                p.bonus += config.consolation_bonus;
            }
        }
        _ => {
            p.bonus *= 0.5;
            p.virgin = 0.0;
        }
    }
    p.refresh_total();

    let ind = &ctx.individuals[individual];
    let event = AllocEvent::ShiftAssigned {
        phase: ctx.phase,
        shift,
        individual,
        kind,
        qualified: requesters.len(),
        points_assigned: ind.points_assigned,
        request: ind.request,
    };
    ctx.record(event);
}

/// Kill an institution that met its quota and caution one that is
/// exactly `caution_margin` short.
///
/// Killing sets every member's base priority to the signed deficit
/// (≤ 0) and clears their bonus. Totals are refreshed here so the
/// sum invariant never lapses.
pub fn propagate_quota(ctx: &mut RunContext, config: &EngineConfig, institution: InstitutionIdx) {
    let inst = &ctx.institutions[institution];
    let deficit = inst.deficit();
    let quota = inst.quota;

    if deficit <= 0 {
        let members: Vec<IndividualIdx> = ctx.members(institution).collect();
        for m in members {
            let p = &mut ctx.individuals[m].priority;
            p.base = f64::from(deficit);
            p.bonus = 0.0;
            p.refresh_total();
        }
        ctx.record(AllocEvent::QuotaReached { institution, deficit });
    }
    if deficit == config.caution_margin && quota > config.caution_margin {
        let members: Vec<IndividualIdx> = ctx.members(institution).collect();
        for m in members {
            ctx.individuals[m].caution = true;
        }
        ctx.record(AllocEvent::InstitutionCautioned { institution });
    }
}
