use std::env;

use anyhow::Result;
use waymark_api::build_app;
use waymark_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("waymark_api");

    let bind = env::var("WAYMARK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app().await?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "waymark api started");

    axum::serve(listener, app).await?;
    Ok(())
}
