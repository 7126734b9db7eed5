//! Realtime management handlers: status, statistics, event catalog, and
//! manual updates.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::{
    BroadcastRequest, EventCatalogResponse, EventDescription, ManualUpdateResponse,
    NotifyStationRequest, NotifyTrainRequest, RealtimeEndpoints, RealtimeStatusResponse,
    TriggerUpdateRequest,
};
use crate::app_state::AppState;
use crate::domain::EventName;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::{ConnectionStats, ManualTarget};
use crate::ws::messages::ClientCommand;

const fn describe(event: EventName) -> &'static str {
    match event {
        EventName::TrainUpdate => "Train state change at a subscribed station",
        EventName::TrainStatus => "State of a tracked or queried train",
        EventName::StationUpdates => "Station record with its active trains",
        EventName::SystemUpdate => "Aggregate counters after each generator tick",
        EventName::SystemHeartbeat => "Liveness signal sent every tick",
        EventName::ManualUpdate => "Operator-triggered message",
        EventName::TrainNotFound => "Queried train has no state yet",
        EventName::Subscribed => "Join or track acknowledged",
        EventName::Unsubscribed => "Leave or untrack acknowledged",
        EventName::Error => "Inbound frame rejected",
    }
}

/// `GET /realtime/status` — Realtime service description.
#[utoipa::path(
    get,
    path = "/api/v1/realtime/status",
    tag = "Realtime",
    summary = "Realtime service status",
    responses(
        (status = 200, description = "Service description", body = RealtimeStatusResponse),
    )
)]
pub async fn realtime_status(State(state): State<AppState>) -> impl IntoResponse {
    let tick_interval_ms = u64::try_from(state.config.tick_interval.as_millis()).unwrap_or(u64::MAX);
    Json(RealtimeStatusResponse {
        service: "realtime".to_string(),
        status: "active".to_string(),
        generator_enabled: state.config.generator_enabled,
        tick_interval_ms,
        station_store: state.station_service.store().backend().to_string(),
        features: [
            "WebSocket connections",
            "Real-time train updates",
            "Station-specific notifications",
            "Train tracking",
            "System heartbeat",
        ]
        .into_iter()
        .map(str::to_string)
        .collect(),
        endpoints: RealtimeEndpoints {
            websocket: "/ws".to_string(),
            events: EventName::ALL
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
        },
        timestamp: Utc::now(),
    })
}

/// `GET /realtime/connections` — Connection statistics.
#[utoipa::path(
    get,
    path = "/api/v1/realtime/connections",
    tag = "Realtime",
    summary = "Connection statistics",
    description = "Live connection count, total subscriptions across connections, and trains in the latest-value table.",
    responses(
        (status = 200, description = "Statistics", body = ConnectionStats),
    )
)]
pub async fn connection_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.realtime.connection_stats().await)
}

/// `GET /realtime/events` — Client and server event catalog.
#[utoipa::path(
    get,
    path = "/api/v1/realtime/events",
    tag = "Realtime",
    summary = "Event catalog",
    responses(
        (status = 200, description = "Event catalog", body = EventCatalogResponse),
    )
)]
pub async fn event_catalog() -> impl IntoResponse {
    let client_events = ClientCommand::NAMES
        .iter()
        .map(|name| EventDescription {
            name: (*name).to_string(),
            description: ClientCommand::describe(name)
                .unwrap_or_default()
                .to_string(),
        })
        .collect();
    let server_events = EventName::ALL
        .iter()
        .map(|event| EventDescription {
            name: event.as_str().to_string(),
            description: describe(*event).to_string(),
        })
        .collect();
    Json(EventCatalogResponse {
        client_events,
        server_events,
    })
}

/// `POST /realtime/trigger-update` — Manual update to a station, a train,
/// or everyone.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if a station or train target
/// lacks a valid id in `data`.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/trigger-update",
    tag = "Realtime",
    summary = "Trigger manual update",
    description = "Sends a `manual-update` event. `type` selects station, train, or system-wide delivery; unknown types fall back to system-wide.",
    request_body = TriggerUpdateRequest,
    responses(
        (status = 200, description = "Update queued", body = ManualUpdateResponse),
        (status = 400, description = "Missing target id", body = ErrorResponse),
    )
)]
pub async fn trigger_update(
    State(state): State<AppState>,
    Json(req): Json<TriggerUpdateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let target = ManualTarget::resolve(&req.kind, &req.data)?;
    Ok(Json(dispatch(&state, target, req.data).await))
}

/// `POST /realtime/broadcast` — Manual update to every connection.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if `event` or `message` is empty.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/broadcast",
    tag = "Realtime",
    summary = "Broadcast to all clients",
    request_body = BroadcastRequest,
    responses(
        (status = 200, description = "Broadcast queued", body = ManualUpdateResponse),
        (status = 400, description = "Event and message are required", body = ErrorResponse),
    )
)]
pub async fn broadcast(
    State(state): State<AppState>,
    Json(req): Json<BroadcastRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    require_non_empty("event", &req.event)?;
    require_non_empty("message", &req.message)?;
    let data = json!({
        "event": req.event,
        "message": req.message,
        "data": req.data.unwrap_or_else(|| json!({})),
    });
    Ok(Json(dispatch(&state, ManualTarget::System, data).await))
}

/// `POST /realtime/notify-station` — Manual update to one station's
/// subscribers.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if `message` is empty.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/notify-station",
    tag = "Realtime",
    summary = "Notify station subscribers",
    request_body = NotifyStationRequest,
    responses(
        (status = 200, description = "Notification queued", body = ManualUpdateResponse),
        (status = 400, description = "Station id and message are required", body = ErrorResponse),
    )
)]
pub async fn notify_station(
    State(state): State<AppState>,
    Json(req): Json<NotifyStationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    require_non_empty("message", &req.message)?;
    let data = json!({
        "station_id": req.station_id,
        "message": req.message,
        "data": req.data.unwrap_or_else(|| json!({})),
    });
    let target = ManualTarget::Station(req.station_id);
    Ok(Json(dispatch(&state, target, data).await))
}

/// `POST /realtime/notify-train` — Manual update to one train's trackers.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if `message` is empty.
#[utoipa::path(
    post,
    path = "/api/v1/realtime/notify-train",
    tag = "Realtime",
    summary = "Notify train trackers",
    request_body = NotifyTrainRequest,
    responses(
        (status = 200, description = "Notification queued", body = ManualUpdateResponse),
        (status = 400, description = "Train id and message are required", body = ErrorResponse),
    )
)]
pub async fn notify_train(
    State(state): State<AppState>,
    Json(req): Json<NotifyTrainRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    require_non_empty("message", &req.message)?;
    let data = json!({
        "train_id": req.train_id,
        "message": req.message,
        "data": req.data.unwrap_or_else(|| json!({})),
    });
    let target = ManualTarget::Train(req.train_id);
    Ok(Json(dispatch(&state, target, data).await))
}

async fn dispatch(
    state: &AppState,
    target: ManualTarget,
    data: serde_json::Value,
) -> ManualUpdateResponse {
    let kind = match target {
        ManualTarget::Station(_) => "station",
        ManualTarget::Train(_) => "train",
        ManualTarget::System => "system",
    };
    let delivered = state
        .realtime
        .trigger_manual_update(target, data.clone())
        .await;
    ManualUpdateResponse {
        target: kind.to_string(),
        delivered,
        data,
        source: "manual".to_string(),
        timestamp: Utc::now(),
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(format!("{field} is required")));
    }
    Ok(())
}

/// Realtime routes, relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/realtime/status", get(realtime_status))
        .route("/realtime/connections", get(connection_stats))
        .route("/realtime/events", get(event_catalog))
        .route("/realtime/trigger-update", post(trigger_update))
        .route("/realtime/broadcast", post(broadcast))
        .route("/realtime/notify-station", post(notify_station))
        .route("/realtime/notify-train", post(notify_train))
}
