//! Handlers for the daily-pass commands. Results go to stdout as JSON;
//! logs go to stderr.

use chrono::{DateTime, Utc};
use dreamloop_core::AppConfig;
use dreamloop_daily::{Collaborators, DailyOrchestrator, RunResult, RunTotals};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct RunReport {
    results: Vec<RunResult>,
    totals: RunTotals,
}

fn orchestrator(pool: PgPool, config: &AppConfig) -> anyhow::Result<DailyOrchestrator> {
    let collaborators = Collaborators::from_app_config(pool, config)?;
    Ok(DailyOrchestrator::new(collaborators)
        .with_max_concurrent_users(config.daily_max_concurrent_users)
            .with_temperature_unit(config.temperature_unit))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_daily(
    pool: PgPool,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let results = orchestrator(pool, config)?.run(now).await?;
    let totals = RunTotals::from_results(&results);
    print_json(&RunReport { results, totals })
}

pub(crate) async fn generate_today(
    pool: PgPool,
    config: &AppConfig,
    user_id: Uuid,
) -> anyhow::Result<()> {
    let record = orchestrator(pool, config)?
        .materialize_today(user_id, Utc::now())
        .await?;
    print_json(&record)
}

pub(crate) async fn push_today(
    pool: PgPool,
    config: &AppConfig,
    user_id: Uuid,
) -> anyhow::Result<()> {
    let report = orchestrator(pool, config)?
        .push_today(user_id, Utc::now())
        .await?;
    print_json(&report)
}
