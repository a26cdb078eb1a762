//! Job queue listing (`GET /jobs`).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ControlError;

/// One entry in the jobs collection returned by the instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    /// Job identifier (used by `jobs --delete`).
    #[serde(default)]
    pub job_id: String,
    /// Event the job was generated from.
    #[serde(default)]
    pub event_id: String,
    /// Adapter processing the job.
    #[serde(default)]
    pub adapter_id: String,
    /// Current job status string.
    #[serde(default)]
    pub status: String,
    /// Number of failed attempts so far.
    #[serde(default)]
    pub failures: u32,
}

/// Parse the jobs collection response body (a JSON array of descriptors).
pub fn parse_jobs(body: &str) -> Result<Vec<Job>, ControlError> {
    serde_json::from_str(body)
        .map_err(|err| ControlError::InvalidResponse(format!("jobs listing: {err}")))
}

/// Emit one labeled log block per job, 1-indexed, in response order.
///
/// The listing is a full snapshot at call time; there is no pagination or
/// filtering.
pub fn log_jobs(jobs: &[Job]) {
    info!("{} job(s) in queue", jobs.len());
    for (index, job) in jobs.iter().enumerate() {
        info!("[{}] Job ID   : {}", index + 1, job.job_id);
        info!("[{}] Event ID : {}", index + 1, job.event_id);
        info!("[{}] Adapter  : {}", index + 1, job.adapter_id);
        info!("[{}] Status   : {}", index + 1, job.status);
        info!("[{}] Failures : {}", index + 1, job.failures);
    }
}
