mod daily;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "dreamloop-cli")]
#[command(about = "DreamLoop daily engine command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run one daily pass over every eligible profile and print the results
    RunDaily {
        /// Evaluate as of this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Get or generate today's card for one user, ignoring their send time
    GenerateToday {
        #[arg(long)]
        user_id: Uuid,
    },
    /// Push today's stored card to one user's devices
    PushToday {
        #[arg(long)]
        user_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = dreamloop_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = dreamloop_db::PoolConfig::from_app_config(&config);
    let pool = dreamloop_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = dreamloop_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
        }
        Commands::RunDaily { at } => {
            daily::run_daily(pool, &config, at.unwrap_or_else(Utc::now)).await?;
        }
        Commands::GenerateToday { user_id } => {
            daily::generate_today(pool, &config, user_id).await?;
        }
        Commands::PushToday { user_id } => {
            daily::push_today(pool, &config, user_id).await?;
        }
    }

    Ok(())
}
