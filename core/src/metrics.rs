//! Imbalance metric of a finished run.
//!
//! RULE: Comparison is lexicographic over (open deficit, institution
//! chi-square, individual chi-square), in that field order. The derived
//! `Ord` depends on the declaration order below.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::RunContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImbalanceMetric {
    /// Σ (quota − assigned) over institutions.
    pub open_deficit:      i64,
    /// Σ (quota − assigned)² over institutions.
    pub institution_chisq: i64,
    /// Σ (requested − assigned)² over individuals, plus
    /// (total shift points − total requested points).
    pub individual_chisq:  i64,
}

impl ImbalanceMetric {
    /// Pure function of the context; calling it twice without an
    /// intervening mutation yields the same triple.
    pub fn compute(ctx: &RunContext) -> Self {
        let mut open_deficit = 0i64;
        let mut institution_chisq = 0i64;
        for inst in &ctx.institutions {
            let d = i64::from(inst.deficit());
            open_deficit += d;
            institution_chisq += d * d;
        }

        let mut individual_chisq: i64 = ctx
            .individuals
            .iter()
            .map(|ind| {
                let d = i64::from(ind.remaining());
                d * d
            })
            .sum();
        individual_chisq += i64::from(ctx.total_points) - i64::from(ctx.total_requests);

        Self { open_deficit, institution_chisq, individual_chisq }
    }
}

impl fmt::Display for ImbalanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deficit={} inst_chisq={} ind_chisq={}",
            self.open_deficit, self.institution_chisq, self.individual_chisq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(a: i64, b: i64, c: i64) -> ImbalanceMetric {
        ImbalanceMetric { open_deficit: a, institution_chisq: b, individual_chisq: c }
    }

    #[test]
    fn ordering_is_lexicographic_by_field() {
        assert!(m(0, 99, 99) < m(1, 0, 0));
        assert!(m(2, 3, 99) < m(2, 4, 0));
        assert!(m(2, 4, 5) < m(2, 4, 6));
        assert_eq!(m(2, 4, 6).cmp(&m(2, 4, 6)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn display_names_every_component() {
        assert_eq!(m(-1, 7, 12).to_string(), "deficit=-1 inst_chisq=7 ind_chisq=12");
    }
}
