use std::sync::Arc;

use mimalloc::MiMalloc;
use skycast::api::WeatherApiClient;
use skycast::db::{self, UserStorage};
use skycast::service::{Argon2Hasher, UserService};
use skycast::{AppState, Config, skycast_router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        weather_api_base = %cfg.weather_api_base,
        loglevel = %cfg.loglevel,
        default_location = %cfg.default_location
    );
    if cfg.weather_api_key.is_empty() {
        warn!("SKYCAST_WEATHER_API_KEY is not set; weather lookups will be rejected upstream");
    }

    let pool = db::connect(&cfg.database_url).await?;
    let storage = UserStorage::new(pool);
    storage.init_schema().await?;

    let users = UserService::new(storage, Arc::new(Argon2Hasher));
    let weather = WeatherApiClient::from_config(&cfg)?;
    let addr = cfg.listen_addr.clone();
    let state = AppState::new(users, weather, Arc::new(cfg));
    let app = skycast_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
