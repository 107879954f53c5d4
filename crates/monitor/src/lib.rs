//! Poll cycles for scheduler jobs and disk quota.
//!
//! Each cycle runs once per invocation: external commands are executed,
//! their output parsed, and any resulting notifications delivered in
//! order before the process exits.

pub mod error;
pub mod jobs;
pub mod quota;
pub mod runner;

pub use error::{MonitorError, Result};
pub use jobs::{JobCycle, JobMonitor};
pub use quota::QuotaMonitor;
pub use runner::{CommandRunner, ProcessRunner};
