use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskfeed_api::{build_router, AppState};
use taskfeed_common::Config;
use taskfeed_store::PgFeedStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskfeed=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    // Bounded pool with a server-side statement timeout: a feed query that
    // cannot finish in a few seconds should fail the request, not hang it.
    let connect_opts: PgConnectOptions = config.database_url.parse()?;
    let connect_opts = connect_opts.options([("statement_timeout", "5s")]);
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_opts)
        .await?;
    info!("Connected to database");

    let state = AppState {
        store: Arc::new(PgFeedStore::new(pool)),
    };
    let app = build_router(state, config.cors_origin.clone());

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Task feed API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
