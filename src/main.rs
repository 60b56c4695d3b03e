//! Wicket - HTTP gateway for the files-manager stores

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wicket::{
    config::Args,
    server::{self, AppState},
    store::{MongoStore, RedisStore},
    types::WicketError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("wicket={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("==================================");
    info!("  Wicket - files-manager gateway");
    info!("==================================");
    info!("Listen: {}", args.listen());
    info!("MongoDB: {} (db: {})", args.mongodb_uri(), args.db_database);
    info!("Redis: {}", args.redis_url);
    info!("==================================");

    // Construct the store adapters. Neither blocks on its backend here:
    // MongoDB connects lazily, Redis per operation.
    let mongo = MongoStore::new(&args.mongodb_uri(), &args.db_database).await?;
    let redis = RedisStore::new(&args.redis_url)?;

    // Startup readiness gate: give the persistent store a bounded window to
    // come up, then fail fast. Consulted only here; request-path code treats
    // later outages as per-request failures.
    match mongo
        .wait_until_alive(args.db_wait_attempts, args.db_wait_interval())
        .await
    {
        Ok(()) => info!("MongoDB connected successfully"),
        Err(WicketError::ConnectionTimeout(msg)) => {
            error!("MongoDB readiness gate failed: {}", msg);
            std::process::exit(1);
        }
        Err(e) => {
            error!("MongoDB readiness gate failed: {}", e);
            std::process::exit(1);
        }
    }

    let state = Arc::new(AppState::new(args, Arc::new(mongo), Arc::new(redis)));

    server::run(state).await?;

    Ok(())
}
