//! Priority model.
//!
//! total = base + virgin + bonus + random, refreshed whenever a component
//! changes and once per round for every individual.

use crate::{context::RunContext, rng::PriorityRng};

/// New random term for every open individual, then refresh all totals.
/// Killed or zero-base individuals lose their accumulated bonus; the
/// virgin bonus is kept.
pub fn recompute_priorities(ctx: &mut RunContext, rng: &mut PriorityRng) {
    for ind in &mut ctx.individuals {
        if ind.open {
            ind.priority.random = rng.priority_draw();
        }
        if ind.priority.base <= 0.0 {
            ind.priority.bonus = 0.0;
        }
        ind.priority.refresh_total();
    }
}
