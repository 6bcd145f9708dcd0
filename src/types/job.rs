//! Jobs: the unit of asynchronous work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OptionsMap;

/// Server-driven job lifecycle. `pending -> running -> {completed | failed |
/// cancelled}`; a job may also fail or be cancelled straight from `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One asynchronous invocation of a tool. The lifecycle is driven entirely
/// server-side; the client only observes it via polling.
///
/// Older endpoints spell some keys differently (`job_id`, `tool`,
/// `input_files`/`output_files`); the aliases here absorb all spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(alias = "job_id")]
    pub id: String,
    #[serde(alias = "tool")]
    pub tool_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// 0-100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "input_files")]
    pub inputs: Vec<String>,
    #[serde(default, alias = "output_files")]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub options: OptionsMap,
}

/// Point-in-time progress snapshot, derived from one job fetch.
#[derive(Debug, Clone, Serialize)]
pub struct JobProgress {
    pub status: JobStatus,
    pub progress: u8,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Job> for JobProgress {
    fn from(job: &Job) -> Self {
        Self {
            status: job.status,
            progress: job.progress,
            error: job.error.clone(),
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
        }
    }
}
