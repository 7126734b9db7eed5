//! REST API layer: route handlers, DTOs, router composition, and the
//! OpenAPI document.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` sits at the
//! root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "station-gateway",
        description = "Station catalog REST API with a WebSocket live train-update channel at `/ws`."
    ),
    paths(
        handlers::system::health_handler,
        handlers::station::list_stations,
        handlers::station::get_station,
        handlers::station::create_station,
        handlers::station::update_station,
        handlers::station::delete_station,
        handlers::realtime::realtime_status,
        handlers::realtime::connection_stats,
        handlers::realtime::event_catalog,
        handlers::realtime::trigger_update,
        handlers::realtime::broadcast,
        handlers::realtime::notify_station,
        handlers::realtime::notify_train,
    ),
    tags(
        (name = "System", description = "Service health"),
        (name = "Stations", description = "Station catalog"),
        (name = "Realtime", description = "Live-update management"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/stations",
            "/api/v1/stations/{id}",
            "/api/v1/realtime/status",
            "/api/v1/realtime/connections",
            "/api/v1/realtime/events",
            "/api/v1/realtime/trigger-update",
            "/api/v1/realtime/broadcast",
            "/api/v1/realtime/notify-station",
            "/api/v1/realtime/notify-train",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
