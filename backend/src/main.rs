//! Backend entry-point: loads settings, migrates the database and serves
//! the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fitfeed::inbound::http::health::HealthState;
use fitfeed::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, BuildMode, ServerConfig, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let feed_settings = settings.feed_settings().map_err(std::io::Error::other)?;
    let key = load_session_key(
        &settings.session_key_file(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;

    let applied = run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(
        PoolConfig::new(database_url)
            .with_max_size(settings.pool_size()),
    )
    .await
    .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, bind_addr, pool.clone())
        .with_cookie_secure(settings.cookie_secure())
        .with_feed_settings(feed_settings);
    let server = create_server(health_state.clone(), config)?;

    match pool.ping().await {
        Ok(()) => health_state.mark_ready(),
        Err(error) => warn!(%error, "database ping failed; staying unready"),
    }
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
