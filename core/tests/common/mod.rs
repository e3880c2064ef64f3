//! In-memory fixtures shared by the integration tests.
#![allow(dead_code)]

use shiftalloc_core::{
    config::EngineConfig,
    context::RunContext,
    individual::{ConsecutiveNeed, OveragePolicy, RestClass, SpacingClass},
    input::{InstitutionRow, PriorityRow, QuestionnaireRow, RecordSet, ShiftRow},
    rng::PriorityRng,
    types::{InstitutionIdx, Points, ShiftIdx},
};

const LABELS: [&str; 3] = ["Owl", "Day", "Swing"];

/// `n` one-point shifts cycling night, day, swing.
pub fn calendar(n: usize) -> Vec<ShiftRow> {
    (0..n)
        .map(|i| ShiftRow {
            date:        format!("Oct{:02}", i / 3 + 1),
            label:       LABELS[i % 3].to_string(),
            kind:        (i % 3) as i64,
            points:      1,
            export_type: format!("CR-{}", LABELS[i % 3]),
            export_date: format!("2016-10-{:02}", i / 3 + 1),
        })
        .collect()
}

pub fn institution(name: &str, quota: Points) -> InstitutionRow {
    InstitutionRow { name: name.to_string(), quota }
}

/// A plain shifter: no consecutive need, long rest, 3-shift spacing,
/// no overage, same preferences in both phases.
pub fn shifter(
    name: &str,
    home: InstitutionIdx,
    request: Points,
    n_shifts: usize,
    prefs: &[ShiftIdx],
) -> QuestionnaireRow {
    let mut lop1 = vec![false; n_shifts];
    for &p in prefs {
        lop1[p] = true;
    }
    QuestionnaireRow {
        name:          name.to_string(),
        id:            format!("{}-id", name.to_lowercase()),
        email:         format!("{}@lab.test", name.to_lowercase()),
        home,
        request,
        overage:       OveragePolicy::RejectOverage,
        consecutive:   ConsecutiveNeed::None,
        rest:          RestClass::Long,
        spacing:       SpacingClass::NoBreak,
        extra_virgin:  false,
        special:       false,
        justification: String::new(),
        lop2:          lop1.clone(),
        lop1,
    }
}

/// Add phase-2-only preferences.
pub fn with_lop2(mut row: QuestionnaireRow, extra: &[ShiftIdx]) -> QuestionnaireRow {
    for &p in extra {
        row.lop2[p] = true;
    }
    row
}

pub fn records(
    institutions: Vec<InstitutionRow>,
    shifts: Vec<ShiftRow>,
    questionnaire: Vec<QuestionnaireRow>,
) -> (RecordSet, EngineConfig) {
    let real = shifts.iter().filter(|s| s.points > 0).count();
    let config = EngineConfig::default_test(real);
    let records = RecordSet::new(institutions, shifts, Vec::new(), questionnaire, &config, None)
        .expect("fixture records are valid");
    (records, config)
}

pub fn context(records: &RecordSet, config: &EngineConfig, seed: u64) -> RunContext {
    let mut rng = PriorityRng::new(seed);
    RunContext::from_records(records, config, &mut rng, false)
}

/// A small but busy period: 36 shifts over 12 days, every third night
/// worth 2 points, 3 institutions whose quotas cover the calendar, and 12
/// shifters with a mix of consecutive, spacing and overage answers.
pub fn sample_period() -> (RecordSet, EngineConfig) {
    let _ = env_logger::builder().is_test(true).try_init();
    const N: usize = 36;
    let mut shifts = calendar(N);
    for (i, s) in shifts.iter_mut().enumerate() {
        if i % 9 == 0 {
            s.points = 2;
        }
    }
    let institutions = vec![institution("Argonne", 16), institution("Brookhaven", 14), institution("Caltech", 10)];

    let requests: [Points; 12] = [4, 3, 5, 2, 4, 3, 3, 4, 2, 5, 3, 4];
    let questionnaire = (0..12)
        .map(|i| {
            let prefs: Vec<ShiftIdx> = (0..N).filter(|s| (s * 5 + i * 7) % 11 < 4).collect();
            let extra: Vec<ShiftIdx> = (0..N).filter(|s| (s * 3 + i) % 7 == 0).collect();
            let mut row = with_lop2(
                shifter(&format!("Shifter{i:02}"), i % 3, requests[i], N, &prefs),
                &extra,
            );
            row.consecutive = match i % 5 {
                1 => ConsecutiveNeed::NotStrict,
                3 => ConsecutiveNeed::Strict,
                _ => ConsecutiveNeed::None,
            };
            if i % 2 == 1 {
                row.rest = RestClass::Short;
            }
            if i % 4 == 2 {
                row.spacing = SpacingClass::OneShift;
            }
            if i % 6 == 0 {
                row.overage = OveragePolicy::AllowOverage;
            }
            row.special = i == 4;
            row.extra_virgin = i == 7;
            row
        })
        .collect();

    let config = EngineConfig::default_test(N);
    let priorities = vec![PriorityRow { id: "shifter04-id".to_string(), code: "H".to_string() }];
    let records = RecordSet::new(institutions, shifts, priorities, questionnaire, &config, None)
        .expect("sample period is valid");
    (records, config)
}
