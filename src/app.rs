/*
 * Responsibility
 * - Config読み込み → engine 生成 → Router 組み立て
 * - Middleware の適用 (auth / http)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{api, config::Config, middleware, services::auth::build_engine, state::AppState};

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let engine = build_engine(&config)?;
    let state = AppState::new(engine);

    let app = middleware::http::apply(build_router(state), &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
