//! Query plan selection
//!
//! The original system built its grouping clause by string concatenation at
//! query time. Here the grouping policy is an explicit, closed set of plans
//! chosen by a pure decision table over `(resolution, type mode)`, so the
//! policy is testable on its own and there is no dynamic query text at all.

use crate::query::spec::{Resolution, TypeSelector};

/// The three shapes a consumption query can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlan {
    /// Raw resolution: matching records pass through unaggregated
    RawScan,
    /// "combined" mode: one bucket per (property, truncated date), all types
    /// summed together, emitted type is the "combined" literal
    GroupByBucket,
    /// Specific type, "both", or no type filter: one bucket per
    /// (property, truncated date, type), per-type sums kept distinct
    GroupByBucketAndType,
}

impl QueryPlan {
    /// Decision table keyed on `(resolution, type mode)`
    ///
    /// Raw resolution always wins: a raw query never aggregates, whatever
    /// the type selector says.
    pub fn select(resolution: Resolution, kind: &TypeSelector) -> Self {
        match (resolution, kind) {
            (Resolution::Raw, _) => Self::RawScan,
            (_, TypeSelector::Combined) => Self::GroupByBucket,
            (_, TypeSelector::Any | TypeSelector::Only(_)) => Self::GroupByBucketAndType,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_wins_over_every_type_mode() {
        for kind in [
            TypeSelector::Any,
            TypeSelector::Combined,
            TypeSelector::Only("electric".to_string()),
        ] {
            assert_eq!(
                QueryPlan::select(Resolution::Raw, &kind),
                QueryPlan::RawScan
            );
        }
    }

    #[test]
    fn test_combined_groups_by_bucket_only() {
        for resolution in [Resolution::Hour, Resolution::Day, Resolution::Month] {
            assert_eq!(
                QueryPlan::select(resolution, &TypeSelector::Combined),
                QueryPlan::GroupByBucket
            );
        }
    }

    #[test]
    fn test_other_modes_keep_types_distinct() {
        for resolution in [Resolution::Hour, Resolution::Day, Resolution::Month] {
            assert_eq!(
                QueryPlan::select(resolution, &TypeSelector::Any),
                QueryPlan::GroupByBucketAndType
            );
            assert_eq!(
                QueryPlan::select(resolution, &TypeSelector::Only("gas".to_string())),
                QueryPlan::GroupByBucketAndType
            );
        }
    }
}
