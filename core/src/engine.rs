//! The allocation engine: one full pipeline pass for one seed.
//!
//! EXECUTION ORDER (fixed):
//!   1. LoP-1 phase     rounds until no open shift has a qualified requester
//!   2. switch_phase    active lists become the LoP-2 supersets
//!   3. LoP-2 phase     same loop, base-priority and caution gates lifted
//!   4. rebalance       donations from over-quota to under-quota institutions
//!   5. metric          the imbalance triple handed back to the driver
//!
//! RULES:
//!   - All randomness flows through the engine's PriorityRng.
//!   - All state changes are recorded in the context's event log.
//!   - An engine is built fresh from a RecordSet for every seed.

use crate::{
    config::EngineConfig,
    context::RunContext,
    donation::rebalance,
    input::RecordSet,
    metrics::ImbalanceMetric,
    phase::{run_phase, switch_phase},
    report::AllocationOutcome,
    rng::PriorityRng,
    types::Phase,
};

pub struct AllocEngine<'a> {
    pub ctx:    RunContext,
    config:     &'a EngineConfig,
    rng:        PriorityRng,
}

impl<'a> AllocEngine<'a> {
    pub fn new(records: &RecordSet, config: &'a EngineConfig, seed: u64, verbose: bool) -> Self {
        let mut rng = PriorityRng::new(seed);
        let ctx = RunContext::from_records(records, config, &mut rng, verbose);
        Self { ctx, config, rng }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Play LoP-1 to exhaustion. Returns the number of rounds.
    pub fn run_first_phase(&mut self) -> usize {
        run_phase(&mut self.ctx, self.config, &mut self.rng)
    }

    /// Switch to LoP-2 and play it to exhaustion.
    pub fn run_second_phase(&mut self) -> usize {
        if self.ctx.phase == Phase::First {
            switch_phase(&mut self.ctx);
        }
        run_phase(&mut self.ctx, self.config, &mut self.rng)
    }

    pub fn rebalance(&mut self) -> usize {
        rebalance(&mut self.ctx, self.config)
    }

    /// The whole pipeline. Call once per engine.
    pub fn run(&mut self) -> ImbalanceMetric {
        let first = self.run_first_phase();
        let second = self.run_second_phase();
        let donations = self.rebalance();
        let metric = self.metric();
        log::debug!(
            "seed {:#x}: {first} LoP-1 rounds, {second} LoP-2 rounds, {donations} donations, {metric}",
            self.seed()
        );
        metric
    }

    pub fn metric(&self) -> ImbalanceMetric {
        ImbalanceMetric::compute(&self.ctx)
    }

    pub fn outcome(&self) -> AllocationOutcome {
        AllocationOutcome::from_context(&self.ctx, self.seed())
    }
}
