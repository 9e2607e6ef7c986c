use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::funnel::{classify, StageGroup};

/// Raw status counts as reported by the tracker API, keyed by the stored
/// status string.
pub type StatusCountMap = BTreeMap<String, i64>;

/// Funnel totals produced by [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTotals {
    pub applied: u64,
    pub interview: u64,
    pub offered: u64,
    pub rejected: u64,
    pub unclassified: u64,
    pub total: u64,
}

impl StageTotals {
    pub const fn group_total(&self, group: StageGroup) -> u64 {
        match group {
            StageGroup::Applied => self.applied,
            StageGroup::Interview => self.interview,
            StageGroup::Offered => self.offered,
            StageGroup::Rejected => self.rejected,
        }
    }

    /// Whether the computed total agrees with the total reported by the
    /// statistics endpoint.
    pub const fn matches_reported_total(&self, reported: u64) -> bool {
        self.total == reported
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("negative count {count} for status '{status}'")]
    NegativeCount { status: String, count: i64 },
    #[error("status counts overflow the total at '{status}'")]
    TotalOverflow { status: String },
}

/// Tallies raw status counts into funnel buckets.
///
/// Every entry contributes to exactly one bucket, or to `unclassified`
/// when no rule matches; `total` sums all counts regardless of
/// classification. Negative counts are rejected as caller error, as is
/// a sum past `u64::MAX`.
pub fn aggregate(counts: &StatusCountMap) -> Result<StageTotals, AggregationError> {
    let mut totals = StageTotals::default();

    for (status, &count) in counts {
        if count < 0 {
            return Err(AggregationError::NegativeCount {
                status: status.clone(),
                count,
            });
        }
        let count = count as u64;
        totals.total = totals
            .total
            .checked_add(count)
            .ok_or_else(|| AggregationError::TotalOverflow {
                status: status.clone(),
            })?;
        // Each bucket is bounded by total, so the checked add above covers them.
        match classify(status).group() {
            Some(StageGroup::Applied) => totals.applied += count,
            Some(StageGroup::Interview) => totals.interview += count,
            Some(StageGroup::Offered) => totals.offered += count,
            Some(StageGroup::Rejected) => totals.rejected += count,
            None => totals.unclassified += count,
        }
    }

    Ok(totals)
}
