mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use dreamloop_daily::{Collaborators, DailyOrchestrator};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = dreamloop_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = dreamloop_db::PoolConfig::from_app_config(&config);
    let pool = dreamloop_db::connect_pool(&config.database_url, pool_config).await?;
    dreamloop_db::run_migrations(&pool).await?;

    let collaborators = Collaborators::from_app_config(pool.clone(), &config)?;
    let orchestrator = Arc::new(
        DailyOrchestrator::new(collaborators)
            .with_max_concurrent_users(config.daily_max_concurrent_users)
            .with_temperature_unit(config.temperature_unit),
    );

    let _scheduler = if config.daily_scheduler_enabled {
        Some(scheduler::build_scheduler(Arc::clone(&orchestrator), &config.daily_cron).await?)
    } else {
        tracing::info!("scheduler: disabled by DREAMLOOP_DAILY_SCHEDULER_ENABLED");
        None
    };

    let auth = AuthState::from_secret(config.cron_secret.as_deref(), config.is_development())?;
    let app = build_app(
        AppState { pool, orchestrator },
        auth,
        config.is_development(),
    );

    tracing::info!(addr = %config.bind_addr, env = %config.env, "dreamloop-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
