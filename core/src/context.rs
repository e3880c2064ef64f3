//! RunContext: all mutable state of one pipeline run.
//!
//! RULE: Engine operations take the context explicitly. Nothing lives in
//! process-wide state, so independent runs never share mutable data.

use crate::{
    event::AllocEvent,
    individual::{Individual, Priority},
    input::RecordSet,
    institution::Institution,
    rng::PriorityRng,
    shift::{Shift, ShiftKind},
    config::EngineConfig,
    types::{IndividualIdx, InstitutionIdx, Phase, Points, ShiftIdx},
};

pub struct RunContext {
    pub individuals:  Vec<Individual>,
    pub institutions: Vec<Institution>,
    pub shifts:       Vec<Shift>,
    pub phase:        Phase,
    pub total_points: Points,
    pub total_requests: Points,
    pub events:       Vec<AllocEvent>,
    /// Echo every recorded event at info level.
    pub verbose:      bool,
}

impl RunContext {
    /// Build a clean context from validated records. Draws one initial
    /// random priority per individual, in questionnaire order.
    pub fn from_records(
        records: &RecordSet,
        config: &EngineConfig,
        rng: &mut PriorityRng,
        verbose: bool,
    ) -> Self {
        let mut institutions: Vec<Institution> = records
            .institutions
            .iter()
            .map(|r| Institution::new(r.name.clone(), r.quota))
            .collect();

        let shifts: Vec<Shift> = records
            .shifts
            .iter()
            .map(|r| Shift {
                date:        r.date.clone(),
                label:       r.label.clone(),
                kind:        ShiftKind::from_code(r.kind).unwrap_or(ShiftKind::Night),
                points:      r.points,
                export_type: r.export_type.clone(),
                export_date: r.export_date.clone(),
                assignee:    None,
                qualified:   Vec::new(),
                top_requester: None,
                donation_priority: 0,
            })
            .collect();

        let mut individuals = Vec::with_capacity(records.questionnaire.len());
        for (q, tier) in records.questionnaire.iter().zip(&records.base_tiers) {
            institutions[q.home].points_requested += q.request;
            let base = if institutions[q.home].quota == 0 { 0.0 } else { tier.base_priority() };
            let mut virgin = config.virgin_bonus;
            if q.extra_virgin {
                virgin += config.extra_virgin_bonus;
            }
            individuals.push(Individual {
                name:          q.name.clone(),
                id:            q.id.clone(),
                email:         q.email.clone(),
                home:          q.home,
                request:       q.request,
                overage:       q.overage,
                consecutive:   q.consecutive,
                rest:          q.rest,
                spacing:       q.spacing,
                special:       q.special,
                justification: q.justification.clone(),
                lop1:          q.lop1.clone(),
                lop2:          q.lop2.clone(),
                active:        q.lop1.clone(),
                priority:      Priority::new(base, virgin, rng.priority_draw()),
                points_assigned: 0,
                assigned:      Vec::new(),
                open:          true,
                caution:       false,
            });
        }

        let mut ctx = Self {
            individuals,
            institutions,
            shifts,
            phase: Phase::First,
            total_points: records.total_points,
            total_requests: records.total_requests,
            events: Vec::new(),
            verbose,
        };
        ctx.record(AllocEvent::RunInitialized {
            seed: rng.seed(),
            individuals: ctx.individuals.len(),
            shifts: ctx.shifts.len(),
        });
        ctx
    }

    pub fn record(&mut self, event: AllocEvent) {
        if self.verbose {
            log::info!("{event}");
        }
        self.events.push(event);
    }

    pub fn home_of(&self, individual: IndividualIdx) -> InstitutionIdx {
        self.individuals[individual].home
    }

    pub fn members(&self, institution: InstitutionIdx) -> impl Iterator<Item = IndividualIdx> + '_ {
        self.individuals
            .iter()
            .enumerate()
            .filter(move |(_, ind)| ind.home == institution)
            .map(|(i, _)| i)
    }

    /// Σ shift points held by an institution's members, recounted from
    /// the individuals. Must always equal the institution's counter.
    pub fn recount_institution(&self, institution: InstitutionIdx) -> Points {
        self.individuals
            .iter()
            .filter(|ind| ind.home == institution)
            .flat_map(|ind| ind.assigned.iter())
            .map(|&s: &ShiftIdx| self.shifts[s].points)
            .sum()
    }
}
