//! Record loader: the four header-less CSV inputs of one period.
//!
//! RULE: Everything the engine needs from the files is decoded and
//! validated here, once. A RecordSet is read-only afterwards; every
//! seed's run builds a fresh RunContext from it.

use crate::{
    config::EngineConfig,
    error::{AllocError, AllocResult},
    individual::{ConsecutiveNeed, OveragePolicy, PriorityTier, RestClass, SpacingClass},
    shift::ShiftKind,
    types::{InstitutionIdx, Points},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Leading fixed fields of a questionnaire row, before the preference cells.
pub const QUESTIONNAIRE_FIXED_FIELDS: usize = 15;

const YES: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionRow {
    pub name:  String,
    pub quota: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRow {
    pub date:        String,
    pub label:       String,
    pub kind:        i64,
    pub points:      Points,
    pub export_type: String,
    pub export_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityRow {
    pub id:   String,
    pub code: String,
}

/// One decoded questionnaire answer set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireRow {
    pub name:          String,
    pub id:            String,
    pub email:         String,
    pub home:          InstitutionIdx,
    pub request:       Points,
    pub overage:       OveragePolicy,
    pub consecutive:   ConsecutiveNeed,
    pub rest:          RestClass,
    pub spacing:       SpacingClass,
    /// Shut out last period; earns the extra virgin bonus.
    pub extra_virgin:  bool,
    pub special:       bool,
    pub justification: String,
    pub lop1:          Vec<bool>,
    pub lop2:          Vec<bool>,
}

impl QuestionnaireRow {
    /// Decode a raw row. `row` is 1-based for error messages.
    /// Blank answers take the questionnaire's defaults.
    pub fn from_record(
        record: &csv::StringRecord,
        row: usize,
        n_shifts: usize,
    ) -> AllocResult<Self> {
        let needed = QUESTIONNAIRE_FIXED_FIELDS + 2 * n_shifts;
        if record.len() < needed {
            return Err(AllocError::MalformedRow {
                file: "questionnaire",
                row,
                reason: format!("{} fields, expected at least {needed}", record.len()),
            });
        }
        let text = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let int = |i: usize| int_field(record, i, row);
        let invalid = |field: &'static str, value: i64| AllocError::InvalidCode { field, value, row };

        let home_ref = int(3)?.unwrap_or(0);
        if home_ref < 1 {
            return Err(invalid("institution", home_ref));
        }
        let raw_request = int(4)?.unwrap_or(0);
        let request = Points::try_from(raw_request).map_err(|_| AllocError::MalformedRow {
            file: "questionnaire",
            row,
            reason: format!("requested points {raw_request} out of range"),
        })?;

        let over = int(6)?.unwrap_or(1);
        let overage = OveragePolicy::from_code(over).ok_or_else(|| invalid("overage", over))?;

        let consec = int(7)?.unwrap_or(2);
        let strict = int(9)?.unwrap_or(2);
        let consecutive = ConsecutiveNeed::from_codes(consec, strict)
            .ok_or_else(|| invalid("consecutive", consec * 10 + strict))?;

        let rest_code = int(8)?.unwrap_or(2);
        let rest = RestClass::from_code(rest_code).ok_or_else(|| invalid("rest", rest_code))?;

        let spacing = if int(10)? == Some(YES) {
            let brk = int(11)?.unwrap_or(1);
            SpacingClass::from_code(brk).ok_or_else(|| invalid("spacing", brk))?
        } else {
            SpacingClass::NoBreak
        };

        let extra_virgin = int(12)? == Some(YES);
        let special = int(13)? == Some(YES);

        let cell = |i: usize| !record.get(i).unwrap_or("").trim().is_empty();
        let lop1: Vec<bool> = (0..n_shifts)
            .map(|n| cell(QUESTIONNAIRE_FIXED_FIELDS + n))
            .collect();
        let lop2: Vec<bool> = (0..n_shifts)
            .map(|n| cell(QUESTIONNAIRE_FIXED_FIELDS + n_shifts + n) || lop1[n])
            .collect();

        Ok(Self {
            name: text(0),
            id: text(1),
            email: text(2),
            home: (home_ref - 1) as InstitutionIdx,
            request,
            overage,
            consecutive,
            rest,
            spacing,
            extra_virgin,
            special,
            justification: text(14),
            lop1,
            lop2,
        })
    }
}

fn int_field(record: &csv::StringRecord, i: usize, row: usize) -> AllocResult<Option<i64>> {
    let raw = record.get(i).unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>().map(Some).map_err(|e| AllocError::MalformedRow {
        file: "questionnaire",
        row,
        reason: format!("field {i} '{raw}': {e}"),
    })
}

/// Export dates must be exactly `YYYY-MM-DD`.
pub fn normalize_export_date(raw: &str) -> String {
    let raw = raw.trim();
    for fmt in ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    log::warn!("export date '{raw}' not recognized, passing through");
    raw.chars().take(10).collect()
}

/// The validated inputs of one allocation period.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub institutions:  Vec<InstitutionRow>,
    pub shifts:        Vec<ShiftRow>,
    pub priorities:    Vec<PriorityRow>,
    pub questionnaire: Vec<QuestionnaireRow>,
    /// Resolved base tier for every questionnaire row.
    pub base_tiers:    Vec<PriorityTier>,
    pub total_points:  Points,
    pub total_requests: Points,
}

impl RecordSet {
    /// Validate in-memory rows.
    ///
    /// `fallback` stands in for a special individual without an override.
    /// Without it such an individual is a `MissingPriority` error.
    pub fn new(
        institutions: Vec<InstitutionRow>,
        shifts: Vec<ShiftRow>,
        priorities: Vec<PriorityRow>,
        questionnaire: Vec<QuestionnaireRow>,
        config: &EngineConfig,
        fallback: Option<PriorityTier>,
    ) -> AllocResult<Self> {
        let real_shifts = shifts.iter().filter(|s| s.points > 0).count();
        if real_shifts != config.expected_shift_count {
            return Err(AllocError::ShiftCountMismatch {
                expected: config.expected_shift_count,
                actual: real_shifts,
            });
        }
        for (i, s) in shifts.iter().enumerate() {
            if ShiftKind::from_code(s.kind).is_none() {
                return Err(AllocError::InvalidCode { field: "shift kind", value: s.kind, row: i + 1 });
            }
            if s.points < 0 {
                return Err(AllocError::InvalidCode {
                    field: "shift points",
                    value: i64::from(s.points),
                    row: i + 1,
                });
            }
        }

        let mut override_tiers = HashMap::with_capacity(priorities.len());
        for p in &priorities {
            let tier = PriorityTier::from_code(&p.code).ok_or_else(|| {
                AllocError::UnknownPriorityCode { individual: p.id.clone(), code: p.code.clone() }
            })?;
            override_tiers.insert(p.id.as_str(), tier);
        }

        let mut base_tiers = Vec::with_capacity(questionnaire.len());
        for (i, q) in questionnaire.iter().enumerate() {
            if q.home >= institutions.len() {
                return Err(AllocError::UnknownInstitution {
                    row: i + 1,
                    reference: q.home as i64 + 1,
                    available: institutions.len(),
                });
            }
            if q.lop1.len() != shifts.len() || q.lop2.len() != shifts.len() {
                return Err(AllocError::MalformedRow {
                    file: "questionnaire",
                    row: i + 1,
                    reason: format!("preference vectors do not cover {} shifts", shifts.len()),
                });
            }
            let tier = if !q.special {
                PriorityTier::Normal
            } else if let Some(&tier) = override_tiers.get(q.id.as_str()) {
                tier
            } else if let Some(tier) = fallback {
                log::warn!(
                    "priority not found for {} ({}), using fallback tier {}",
                    q.name,
                    q.id,
                    tier.code()
                );
                tier
            } else {
                return Err(AllocError::MissingPriority {
                    name: q.name.clone(),
                    id: q.id.clone(),
                    justification: q.justification.clone(),
                });
            };
            base_tiers.push(tier);
        }

        let total_points: Points = shifts.iter().map(|s| s.points).sum();
        let total_requests: Points = questionnaire.iter().map(|q| q.request).sum();
        let total_quota: Points = institutions.iter().map(|i| i.quota).sum();
        if total_quota != total_points {
            log::warn!("institution quotas sum to {total_quota}, calendar holds {total_points} points");
        }

        Ok(Self {
            institutions,
            shifts,
            priorities,
            questionnaire,
            base_tiers,
            total_points,
            total_requests,
        })
    }

    /// Read and validate the four record files in `data_dir`.
    pub fn load(
        data_dir: &str,
        config: &EngineConfig,
        fallback: Option<PriorityTier>,
    ) -> AllocResult<Self> {
        let dir = Path::new(data_dir);
        if !dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory {data_dir} not found"),
            )
            .into());
        }
        let institutions: Vec<InstitutionRow> = read_rows(&dir.join(&config.files.institutions))?;
        let mut shifts: Vec<ShiftRow> = read_rows(&dir.join(&config.files.shifts))?;
        for s in &mut shifts {
            s.export_date = normalize_export_date(&s.export_date);
        }
        let priorities: Vec<PriorityRow> = if dir.join(&config.files.priorities).exists() {
            read_rows(&dir.join(&config.files.priorities))?
        } else {
            Vec::new()
        };

        let mut reader = csv_reader(&dir.join(&config.files.questionnaire))?;
        let mut questionnaire = Vec::new();
        for (i, record) in reader.records().enumerate() {
            questionnaire.push(QuestionnaireRow::from_record(&record?, i + 1, shifts.len())?);
        }

        log::info!(
            "loaded {} institutions, {} shifts, {} overrides, {} shifters from {data_dir}",
            institutions.len(),
            shifts.len(),
            priorities.len(),
            questionnaire.len()
        );
        Self::new(institutions, shifts, priorities, questionnaire, config, fallback)
    }
}

fn csv_reader(path: &Path) -> AllocResult<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?)
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> AllocResult<Vec<T>> {
    let mut reader = csv_reader(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
