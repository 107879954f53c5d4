//! Parsers for raw command output.
//!
//! Status output is best-effort: rows that do not fit the header are
//! skipped rather than failing the whole poll.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::record::{JobRecord, JobRecordSet, QuotaRecord, JOB_ID_FIELD};

/// Field names assigned positionally to a GPFS-style `rquota` line.
pub const DEFAULT_QUOTA_FIELDS: &[&str] = &[
    "Name",
    "Blocks",
    "Quota",
    "Limit",
    "Grace",
    "Files",
    "FileQuota",
    "FileLimit",
    "FileGrace",
];

/// Column separator some quota tools print between the block and file halves.
const QUOTA_SEPARATOR: &str = "|";

/// Parse whitespace-delimited tabular output (e.g. `squeue`) into job records.
///
/// The first non-blank line is the header. Each following non-blank line is
/// one job. Rows with fewer tokens than header columns are skipped; surplus
/// tokens are folded into the last column so reason strings containing
/// spaces survive intact.
pub fn parse_job_records(raw: &str) -> JobRecordSet {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split_whitespace().collect();

    if !headers.contains(&JOB_ID_FIELD) {
        warn!(header = header_line.trim(), "status header has no JOBID column, ignoring output");
        return Vec::new();
    }

    let mut records = Vec::new();
    for (index, line) in lines.enumerate() {
        match parse_row(&headers, line) {
            Some(record) => records.push(record),
            None => debug!(row = index + 1, line = line.trim(), "skipping malformed status row"),
        }
    }
    records
}

fn parse_row(headers: &[&str], line: &str) -> Option<JobRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < headers.len() {
        return None;
    }

    let last = headers.len() - 1;
    let mut fields = IndexMap::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let value = if i == last {
            tokens[last..].join(" ")
        } else {
            tokens[i].to_string()
        };
        fields.insert((*header).to_string(), value);
    }

    JobRecord::new(fields).ok()
}

/// Parse a single quota report line into a record.
///
/// Only the first non-blank line is considered. Its tokens are assigned to
/// `field_names` in order; a short line yields a partial record and empty
/// input an empty one.
pub fn parse_quota_record<S: AsRef<str>>(raw: &str, field_names: &[S]) -> QuotaRecord {
    let Some(line) = raw.lines().find(|line| !line.trim().is_empty()) else {
        return QuotaRecord::default();
    };

    let fields: IndexMap<String, String> = field_names
        .iter()
        .map(|name| name.as_ref().to_string())
        .zip(
            line.split_whitespace()
                .filter(|token| *token != QUOTA_SEPARATOR)
                .map(str::to_string),
        )
        .collect();

    if fields.len() < field_names.len() {
        debug!(
            parsed = fields.len(),
            expected = field_names.len(),
            "quota line shorter than expected, record is partial"
        );
    }

    QuotaRecord::new(fields)
}
