//! Suivi Backend
//!
//! REST backend for the apprentice socio-professional follow-up dashboard.
//! All data is seeded in-memory; there is no persistence layer.

mod api;
mod auth;
mod calendar;
mod config;
mod errors;
mod form;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::Sessions;
use config::Config;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<Sessions>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Suivi Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::warn!("Demo accounts are active; this build has no real identity provider");

    // Seed the in-memory store
    let store = Arc::new(Store::seeded());
    tracing::info!("Store seeded with {} users", store.list_users().await.len());

    // Create application state
    let state = AppState {
        store,
        sessions: Arc::new(Sessions::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes reachable without a session
    let public_routes = Router::new().route("/auth/login", post(api::login));

    // Routes behind the session layer
    let protected_routes = Router::new()
        // Auth
        .route("/auth/logout", post(api::logout))
        .route("/auth/me", get(api::me))
        .route("/auth/profile", put(api::update_profile))
        // Navigation & display metadata
        .route("/navigation", get(api::get_navigation))
        .route("/meta", get(api::get_meta))
        // Dashboard composition
        .route("/dashboard", get(api::get_dashboard))
        // Users
        .route("/users", get(api::list_users))
        .route("/users", post(api::create_user))
        .route("/users/{id}", get(api::get_user))
        .route("/users/{id}", put(api::update_user))
        .route("/users/{id}", delete(api::delete_user))
        .route("/users/{id}/responses", get(api::list_user_responses))
        // Questionnaires
        .route("/questionnaires", get(api::list_questionnaires))
        .route("/questionnaires/{id}", get(api::get_questionnaire))
        .route("/questionnaires/{id}/response", get(api::get_my_response))
        .route("/questionnaires/{id}/response", put(api::save_my_response))
        .route(
            "/questionnaires/{id}/response/validate",
            post(api::validate_my_response),
        )
        .route(
            "/questionnaires/{id}/response/submit",
            post(api::submit_my_response),
        )
        // Events
        .route("/events", get(api::list_events))
        .route("/events", post(api::create_event))
        .route("/events/calendar", get(api::event_calendar))
        .route("/events/upcoming", get(api::upcoming_events))
        .route("/events/{id}", get(api::get_event))
        .route("/events/{id}", put(api::update_event))
        .route("/events/{id}", delete(api::delete_event))
        // Analytics
        .route("/analytics", get(api::get_analytics))
        // Apply session auth middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_auth_layer,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
