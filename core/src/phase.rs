//! Phase driver.
//!
//! ROUND ORDER (fixed):
//!   1. prepare_shifts         qualification depends on the last round
//!   2. select_shift           directed list, then fewest requesters
//!   3. resolve_consecutive    only if the top requester asked
//!   4. dispatch               commits, or recycles the selection
//!   5. recompute_priorities
//!
//! A phase ends when no open shift has a qualified requester.

use crate::{
    commit::commit,
    config::EngineConfig,
    consecutive::{resolve_consecutive, ConsecutiveDecision},
    context::RunContext,
    event::{AllocEvent, CommitKind},
    priority::recompute_priorities,
    rng::PriorityRng,
    selector::{prepare_shifts, select_shift},
    types::{IndividualIdx, Phase, ShiftIdx},
};

/// Run rounds until the active phase is exhausted. Returns the number
/// of rounds played.
pub fn run_phase(ctx: &mut RunContext, config: &EngineConfig, rng: &mut PriorityRng) -> usize {
    let mut rounds = 0;
    loop {
        prepare_shifts(ctx, config);
        let Some(selected) = select_shift(ctx, config) else { break };
        let Some(requester) = ctx.shifts[selected].top_requester else { break };

        let decision = resolve_consecutive(ctx, selected, requester);
        dispatch(ctx, config, selected, requester, decision);
        recompute_priorities(ctx, rng);
        rounds += 1;
    }
    log::debug!("{} finished after {rounds} rounds", ctx.phase.name());
    rounds
}

/// Apply a resolver decision. The only caller of `commit` during the
/// assignment phases.
pub fn dispatch(
    ctx: &mut RunContext,
    config: &EngineConfig,
    selected: ShiftIdx,
    requester: IndividualIdx,
    decision: ConsecutiveDecision,
) {
    match decision {
        ConsecutiveDecision::NotRequested | ConsecutiveDecision::Proceed => {
            commit(ctx, config, selected, requester, CommitKind::Direct);
        }
        ConsecutiveDecision::Companion { companion } => {
            commit(ctx, config, companion, requester, CommitKind::ConsecutiveCompanion);
            commit(ctx, config, selected, requester, CommitKind::Direct);
        }
        ConsecutiveDecision::Trade { freed, landing, occupant } => {
            commit(ctx, config, landing, occupant, CommitKind::TradeLanding { vacated: freed });
            commit(ctx, config, freed, requester, CommitKind::ConsecutiveCompanion);
            commit(ctx, config, selected, requester, CommitKind::Direct);
        }
        ConsecutiveDecision::Recycle => {
            ctx.individuals[requester].active[selected] = false;
            ctx.record(AllocEvent::ShiftRecycled { shift: selected, individual: requester });
        }
    }
}

/// Switch to LoP-2: every active list becomes the phase-2 superset.
pub fn switch_phase(ctx: &mut RunContext) {
    ctx.phase = Phase::Second;
    for ind in &mut ctx.individuals {
        ind.active.clone_from(&ind.lop2);
    }
    ctx.record(AllocEvent::PhaseSwitched { phase: Phase::Second });
}
