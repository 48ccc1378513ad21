use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::api::WeatherApiClient;
use crate::config::Config;
use crate::handlers::{system, users, weather};
use crate::service::UserService;

/// Shared per-process handles. Cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub weather: WeatherApiClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(users: UserService, weather: WeatherApiClient, config: Arc<Config>) -> Self {
        Self {
            users,
            weather,
            config,
        }
    }
}

pub fn skycast_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(system::health))
        .route("/init-db", post(system::init_db))
        .route("/create-user", post(users::create_user))
        .route("/delete-user", delete(users::delete_user))
        .route("/login", post(users::login))
        .route("/update-password", post(users::update_password))
        .route("/update-location", put(users::update_location))
        .route("/weather/current", get(weather::current))
        .route("/weather/forecast", get(weather::forecast))
        .route("/weather/timezone", get(weather::timezone))
        .route("/weather/astronomy", get(weather::astronomy))
        .route("/weather/marine", get(weather::marine));

    Router::new().nest("/api", api).with_state(state)
}
