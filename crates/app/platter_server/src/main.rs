//! Platter API server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use platter_core::db::LocalDb;
use platter_core::recommend::StubRecommender;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "platter_server", about = "Platter API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3200")]
    bind_addr: String,

    /// PostgreSQL connection URL. Overrides the DB_* variables.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Spawn and manage a local PostgreSQL instance in the app data
    /// directory instead of connecting to an external one.
    #[arg(long, default_value_t = false)]
    local_db: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,platter_api=debug,platter_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let mut config = platter_api::config::ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    // In local-db mode, spin up a managed PostgreSQL and point the pool at it.
    let mut local_db = None;
    if args.local_db {
        let mut db = LocalDb::with_default_data_dir().await?;
        db.setup().await?;
        db.start().await?;
        config.database_url = db.connection_url();
        local_db = Some(db);
    }

    info!(database_url = %config.database_url, "starting platter_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    platter_api::migrate(&pool).await?;

    let state = platter_api::AppState {
        pool,
        config: config.clone(),
        recommender: Arc::new(StubRecommender::default()),
    };
    let app = platter_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    let result = axum::serve(listener, app).await;

    if let Some(mut db) = local_db {
        db.stop().await?;
    }

    result?;
    Ok(())
}
