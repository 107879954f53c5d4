pub mod config;
pub mod diff;
pub mod error;
pub mod parser;
pub mod record;
pub mod snapshot;

pub use config::{load_dotenv, CommandSpec, JobsConfig, MessageFormat, QuotaConfig};
pub use diff::JobDiff;
pub use error::*;
pub use parser::{parse_job_records, parse_quota_record, DEFAULT_QUOTA_FIELDS};
pub use record::*;
pub use snapshot::SnapshotStore;
