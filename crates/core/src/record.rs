//! Typed records parsed from scheduler and quota command output.
//!
//! Both record kinds keep their fields in source column order, which is
//! also the order used when persisting snapshots and rendering messages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

/// Column that identifies a job across polls.
pub const JOB_ID_FIELD: &str = "JOBID";

/// Field attached to every quota record naming the fileset it describes.
pub const FILESET_FIELD: &str = "FileSet";

/// Returned when a field map has no [`JOB_ID_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record has no JOBID field")]
pub struct MissingJobId;

/// One row of scheduler status output.
///
/// Values are kept as raw strings; nothing is coerced. A `JobRecord` always
/// carries a `JOBID`, which is checked at construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, String>")]
pub struct JobRecord {
    fields: IndexMap<String, String>,
}

/// All jobs observed in a single poll, in scheduler output order.
pub type JobRecordSet = Vec<JobRecord>;

impl JobRecord {
    pub fn new(fields: IndexMap<String, String>) -> Result<Self, MissingJobId> {
        if !fields.contains_key(JOB_ID_FIELD) {
            return Err(MissingJobId);
        }
        Ok(Self { fields })
    }

    /// Build a record from `(column, value)` pairs, keeping their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Result<Self, MissingJobId>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The job's identity key.
    pub fn id(&self) -> &str {
        self.fields
            .get(JOB_ID_FIELD)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TryFrom<IndexMap<String, String>> for JobRecord {
    type Error = MissingJobId;

    fn try_from(fields: IndexMap<String, String>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl Serialize for JobRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// One line of a quota report.
///
/// Quota records are never diffed, so there is no identity requirement and
/// a record may be empty or partial when the report line was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaRecord {
    fields: IndexMap<String, String>,
}

impl QuotaRecord {
    pub fn new(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Prefix the record with a [`FILESET_FIELD`] naming the identifier it
    /// was queried for. Any parsed field of the same name is replaced.
    pub fn with_identifier(self, identifier: &str) -> Self {
        let mut fields = IndexMap::with_capacity(self.fields.len() + 1);
        fields.insert(FILESET_FIELD.to_string(), identifier.to_string());
        for (key, value) in self.fields {
            if key != FILESET_FIELD {
                fields.insert(key, value);
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
