mod common;

use common::{calendar, institution, shifter};
use shiftalloc_core::{
    config::EngineConfig,
    error::AllocError,
    individual::PriorityTier,
    input::{PriorityRow, RecordSet},
};
use std::fs;

#[test]
fn shift_count_mismatch_is_fatal() {
    let config = EngineConfig::default_test(90);
    let err = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        Vec::new(),
        vec![shifter("Ada", 0, 1, 4, &[0])],
        &config,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AllocError::ShiftCountMismatch { expected: 90, actual: 4 }));
}

#[test]
fn special_shifter_needs_override_or_fallback() {
    let config = EngineConfig::default_test(4);
    let mut ada = shifter("Ada", 0, 1, 4, &[0]);
    ada.special = true;
    ada.justification = "thesis run".to_string();

    let err = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        Vec::new(),
        vec![ada.clone()],
        &config,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AllocError::MissingPriority { ref id, .. } if id == "ada-id"));

    let records = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        Vec::new(),
        vec![ada.clone()],
        &config,
        Some(PriorityTier::Medium),
    )
    .unwrap();
    assert_eq!(records.base_tiers, vec![PriorityTier::Medium]);

    let records = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        vec![PriorityRow { id: "ada-id".into(), code: "X".into() }],
        vec![ada],
        &config,
        Some(PriorityTier::Medium),
    )
    .unwrap();
    assert_eq!(records.base_tiers, vec![PriorityTier::Extraordinary]);
}

#[test]
fn unknown_tier_letter_is_rejected() {
    let config = EngineConfig::default_test(4);
    let err = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        vec![PriorityRow { id: "ada-id".into(), code: "Q".into() }],
        vec![shifter("Ada", 0, 1, 4, &[0])],
        &config,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AllocError::UnknownPriorityCode { .. }));
}

#[test]
fn home_outside_roster_is_rejected() {
    let config = EngineConfig::default_test(4);
    let err = RecordSet::new(
        vec![institution("Lab", 4)],
        calendar(4),
        Vec::new(),
        vec![shifter("Ada", 3, 1, 4, &[0])],
        &config,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AllocError::UnknownInstitution { reference: 4, available: 1, .. }));
}

#[test]
fn loads_the_four_files_from_a_data_dir() {
    let dir = std::env::temp_dir().join(format!("shiftalloc-load-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Inst.csv"), "Argonne,2\nBrookhaven,1\n").unwrap();
    fs::write(
        dir.join("Shift.csv"),
        "Oct01,Owl,0,1,CR-Owl,10/01/16\nOct01,Day,1,1,CR-Day,10/01/16\nOct01,Swing,2,1,CR-Swing,2016-10-01\n",
    )
    .unwrap();
    fs::write(dir.join("Pri.csv"), "bo02,L\n").unwrap();
    fs::write(
        dir.join("Ind.csv"),
        "Ada,ada01,ada@lab,1,2,,,,,,,,,,,1,,1,,,\n\
         Bo,bo02,bo@lab,2,1,,2,1,1,1,1,2,,1,advisor,,1,,,,1,r17\n",
    )
    .unwrap();

    let config = EngineConfig::default_test(3);
    let records = RecordSet::load(dir.to_str().unwrap(), &config, None).unwrap();
    fs::remove_dir_all(&dir).ok();

    assert_eq!(records.institutions.len(), 2);
    assert_eq!(records.shifts[0].export_date, "2016-10-01");
    assert_eq!(records.total_points, 3);
    assert_eq!(records.total_requests, 3);

    let ada = &records.questionnaire[0];
    assert_eq!(ada.home, 0);
    assert_eq!(ada.lop1, vec![true, false, true]);
    assert_eq!(records.base_tiers[0], PriorityTier::Normal);

    let bo = &records.questionnaire[1];
    assert_eq!(bo.home, 1);
    assert!(bo.special);
    assert_eq!(bo.lop1, vec![false, true, false]);
    assert_eq!(bo.lop2, vec![false, true, true]);
    assert_eq!(records.base_tiers[1], PriorityTier::Low);
}

#[test]
fn missing_data_dir_is_an_io_error() {
    let config = EngineConfig::default_test(3);
    let err = RecordSet::load("/nonexistent/shiftalloc/data", &config, None).unwrap_err();
    assert!(matches!(err, AllocError::Io(_)));
}
