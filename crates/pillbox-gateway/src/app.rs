use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

use pillbox_core::config::PillboxConfig;
use pillbox_relay::Relay;
use pillbox_store::PlanStore;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: PillboxConfig,
    pub store: PlanStore,
    /// Injected relay instance; the write path publishes through it after
    /// each committed store write.
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: PillboxConfig, store: PlanStore, relay: Arc<Relay>) -> Self {
        Self {
            config,
            store,
            relay,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::users::list_users))
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/createUser",
            get(crate::http::users::create_user_form).post(crate::http::users::create_user),
        )
        .route(
            "/displayUser/{user_id}",
            get(crate::http::users::display_user),
        )
        .route(
            "/deleteUser/{user_id}",
            get(crate::http::users::delete_user).post(crate::http::users::delete_user),
        )
        .route(
            "/editUser/{user_id}",
            get(crate::http::users::edit_user_form).post(crate::http::users::edit_user),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
