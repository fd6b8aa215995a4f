//! Background trigger for the daily pass.

use std::sync::Arc;

use chrono::Utc;
use dreamloop_daily::{DailyOrchestrator, RunTotals};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the scheduler with the daily job on `cron`.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts the job down.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// `cron` is not a valid expression, or the scheduler fails to start.
pub async fn build_scheduler(
    orchestrator: Arc<DailyOrchestrator>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_daily_job(&scheduler, orchestrator, cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_daily_job(
    scheduler: &JobScheduler,
    orchestrator: Arc<DailyOrchestrator>,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let orchestrator = Arc::clone(&orchestrator);

        Box::pin(async move {
            tracing::info!("scheduler: starting daily pass");
            match orchestrator.run(Utc::now()).await {
                Ok(results) => {
                    let totals = RunTotals::from_results(&results);
                    tracing::info!(
                        users = totals.users,
                        failed = totals.failed,
                        "scheduler: daily pass complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: daily pass aborted");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered daily job");
    Ok(())
}
