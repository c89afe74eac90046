//! HTTP front end for the todos service.
//!
//! # Overview
//! An axum router over per-client sessions. Each routed request is tagged
//! with a session id by `session::resolve_session`, handlers load that
//! client's `todo_core::Session`, apply one change and save it back.

pub mod config;
pub mod error;
pub mod handlers;
pub mod session;
pub mod views;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;
pub use session::{SessionLimits, SessionStore, SESSION_COOKIE};

#[derive(Clone, Default)]
pub struct AppState {
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: SessionStore::new(config.seed, config.session_limits()),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/lists", get(handlers::lists).post(handlers::create_list))
        .route("/lists/new", get(handlers::new_list))
        .route("/lists/{id}", get(handlers::show_list))
        .route(
            "/lists/{id}/edit",
            get(handlers::edit_list).post(handlers::update_list),
        )
        .route("/lists/{id}/destroy", post(handlers::destroy_list))
        .route("/lists/{id}/complete_all", post(handlers::complete_all))
        .route("/lists/{id}/todos", post(handlers::create_todo))
        .route(
            "/lists/{list_id}/todos/{todo_id}/toggle",
            post(handlers::toggle_todo),
        )
        .route(
            "/lists/{list_id}/todos/{todo_id}/destroy",
            post(handlers::destroy_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::resolve_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
