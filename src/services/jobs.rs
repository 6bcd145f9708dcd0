//! Job lifecycle management.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crate::transport::HttpTransport;
use crate::types::{Job, JobProgress};
use crate::Result;

use super::poll::{self, PollOptions};
use super::{decode_field, success_flag};

/// Listing filter for `/api/v2/jobs`.
#[derive(Debug, Clone)]
pub struct JobFilter {
    pub status: Option<crate::types::JobStatus>,
    pub tool_id: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            status: None,
            tool_id: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Accessor for `/api/v2/jobs`.
#[derive(Clone)]
pub struct JobsClient {
    transport: Arc<HttpTransport>,
}

impl JobsClient {
    pub(crate) fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// List jobs, newest first, with optional status/tool filtering.
    pub async fn list(&self, filter: JobFilter) -> Result<Vec<Job>> {
        let mut query = vec![
            ("limit".to_string(), filter.limit.to_string()),
            ("offset".to_string(), filter.offset.to_string()),
        ];
        if let Some(status) = filter.status {
            query.push(("status".to_string(), status.to_string()));
        }
        if let Some(tool_id) = filter.tool_id {
            query.push(("tool_id".to_string(), tool_id));
        }
        let body = self.transport.get_with("/api/v2/jobs", &query).await?;
        decode_field(body, "jobs")
    }

    /// Fetch one job by id.
    pub async fn get(&self, job_id: &str) -> Result<Job> {
        let body = self.transport.get(&format!("/api/v2/jobs/{job_id}")).await?;
        decode_field(body, "job")
    }

    /// One-fetch progress snapshot.
    pub async fn progress(&self, job_id: &str) -> Result<JobProgress> {
        Ok(JobProgress::from(&self.get(job_id).await?))
    }

    /// Poll until the job completes, with the default 1h budget and 5s
    /// interval.
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<Job> {
        self.wait_for_completion_with(job_id, PollOptions::default()).await
    }

    /// Poll until the job completes, with caller-supplied knobs. Fails on
    /// `failed`/`cancelled` terminal states and when the wall-clock budget
    /// runs out.
    pub async fn wait_for_completion_with(&self, job_id: &str, opts: PollOptions) -> Result<Job> {
        poll::wait(job_id, opts, || self.get(job_id)).await
    }

    /// Cancel a pending or running job. Returns whether the server accepted
    /// the cancellation.
    pub async fn cancel(&self, job_id: &str) -> Result<bool> {
        let body = self.transport.post_empty(&format!("/api/v2/jobs/{job_id}/cancel")).await?;
        Ok(success_flag(&body))
    }

    /// Re-queue a failed job; returns the fresh job.
    pub async fn retry(&self, job_id: &str) -> Result<Job> {
        let body = self.transport.post_empty(&format!("/api/v2/jobs/{job_id}/retry")).await?;
        decode_field(body, "job")
    }

    /// Delete a job and free its storage.
    pub async fn delete(&self, job_id: &str) -> Result<bool> {
        let body = self.transport.delete(&format!("/api/v2/jobs/{job_id}")).await?;
        Ok(success_flag(&body))
    }

    /// Download the job's results as a ZIP archive, in memory.
    pub async fn download_results(&self, job_id: &str) -> Result<Bytes> {
        self.transport
            .download(&format!("/api/v2/jobs/{job_id}/download"), &[])
            .await
    }

    /// Stream the results ZIP straight to `path`.
    pub async fn save_results(&self, job_id: &str, path: impl AsRef<Path>) -> Result<()> {
        self.transport
            .download_to(&format!("/api/v2/jobs/{job_id}/download"), &[], path.as_ref())
            .await
    }
}
