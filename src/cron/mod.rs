use crate::state::AppState;
use crate::utils::cron::build_cron_expr;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

mod session_sweep;

pub async fn start_cron_jobs(state: Arc<AppState>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    /*
     * ------------------------------------------------------------
     * session_sweep cron
     * ------------------------------------------------------------
     */

    let (sweep_desc, sweep_cron_expr) = build_cron_expr(state.config.cron.session_sweep.seconds);

    tracing::info!(
        target: "cron",
        "📅 Scheduling session_sweep cron: {} → {}",
        sweep_desc,
        sweep_cron_expr
    );

    scheduler
        .add(Job::new_async(sweep_cron_expr.as_str(), {
            let state = state.clone();
            move |_uuid, _l| {
                let state = state.clone();
                Box::pin(async move {
                    session_sweep::run(state).await;
                })
            }
        })?)
        .await?;

    scheduler.start().await?;
    Ok(scheduler)
}
