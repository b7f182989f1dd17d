use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, dashboard_action_handler, dashboard_handler, health_handler,
    home_handler, not_found_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(home_handler).post(create_link_handler))
            .route("/s/{id}", get(redirect_handler))
            .route(
                "/dashboard",
                get(dashboard_handler).post(dashboard_action_handler),
            )
            .route("/health", get(health_handler))
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
