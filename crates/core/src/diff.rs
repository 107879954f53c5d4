//! Identity-keyed comparison of two job sets.

use std::collections::HashSet;

use crate::record::{JobRecord, JobRecordSet};

/// Jobs that appeared in, or disappeared from, the scheduler since the
/// previous snapshot.
///
/// `appeared` holds records from the current set and `disappeared` records
/// from the previous one, each in the order of the set it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDiff {
    pub appeared: JobRecordSet,
    pub disappeared: JobRecordSet,
}

impl JobDiff {
    pub fn compute(current: &[JobRecord], previous: &[JobRecord]) -> Self {
        let current_ids = job_ids(current);
        let previous_ids = job_ids(previous);

        Self {
            appeared: missing_from(current, &previous_ids),
            disappeared: missing_from(previous, &current_ids),
        }
    }

    /// True when both sets hold the same job ids.
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.disappeared.is_empty()
    }
}

fn job_ids(records: &[JobRecord]) -> HashSet<&str> {
    records.iter().map(JobRecord::id).collect()
}

fn missing_from(records: &[JobRecord], other_ids: &HashSet<&str>) -> JobRecordSet {
    records
        .iter()
        .filter(|record| !other_ids.contains(record.id()))
        .cloned()
        .collect()
}
