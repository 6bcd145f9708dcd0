//! Job-completion polling loop.
//!
//! The loop is a free function generic over the fetch future, so its state
//! machine can be exercised with fake job sources and sub-second intervals;
//! [`JobsClient`](super::JobsClient) wires it to the real endpoint.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::types::{Job, JobStatus};
use crate::{Error, Result};

/// Polling knobs for [`wait_for_completion`](super::JobsClient::wait_for_completion).
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Overall wall-clock budget.
    pub timeout: Duration,
    /// Sleep between status fetches.
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3600),
            interval: Duration::from_secs(5),
        }
    }
}

/// Poll `fetch` until the job reaches a terminal state or the deadline
/// passes.
///
/// `completed` returns the job; `failed` and `cancelled` raise, carrying the
/// job's error text. The deadline is enforced against elapsed wall-clock
/// time before every fetch, not by counting iterations, so a slow fetch
/// cannot stretch the budget.
pub(crate) async fn wait<F, Fut>(job_id: &str, opts: PollOptions, mut fetch: F) -> Result<Job>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Job>>,
{
    let start = Instant::now();

    while start.elapsed() < opts.timeout {
        let job = fetch().await?;
        match job.status {
            JobStatus::Completed => return Ok(job),
            JobStatus::Failed => {
                let reason = job.error.as_deref().unwrap_or("unknown error");
                return Err(Error::api(format!("job {job_id} failed: {reason}")));
            }
            JobStatus::Cancelled => {
                return Err(Error::api(format!("job {job_id} was cancelled")));
            }
            JobStatus::Pending | JobStatus::Running => {
                tokio::time::sleep(opts.interval).await;
            }
        }
    }

    Err(Error::api(format!(
        "job {job_id} timed out after {}s",
        opts.timeout.as_secs()
    )))
}
