//! Station CRUD handlers: list, get, create, update, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::StationListResponse;
use crate::app_state::AppState;
use crate::domain::{Station, StationDraft, StationId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /stations` — List every station.
///
/// # Errors
///
/// Returns [`GatewayError`] if the station store is unavailable.
#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    summary = "List stations",
    description = "Returns every station in the catalog ordered by id.",
    responses(
        (status = 200, description = "Station list", body = StationListResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_stations(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let stations = state.station_service.list().await?;
    Ok(Json(StationListResponse::from(stations)))
}

/// `GET /stations/:id` — Get one station.
///
/// # Errors
///
/// Returns [`GatewayError::StationNotFound`] if the station does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    summary = "Get station",
    params(
        ("id" = i32, Path, description = "Station id"),
    ),
    responses(
        (status = 200, description = "Station record", body = Station),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Station not found", body = ErrorResponse),
    )
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    let station = state.station_service.get(StationId::new(id)?).await?;
    Ok(Json(station))
}

/// `POST /stations` — Create a station.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on missing fields or
/// out-of-range coordinates.
#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    summary = "Create station",
    description = "Creates a station. Name and city must be non-empty; latitude must lie in [-90, 90] and longitude in [-180, 180].",
    request_body = StationDraft,
    responses(
        (status = 201, description = "Station created", body = Station),
        (status = 400, description = "Invalid station", body = ErrorResponse),
    )
)]
pub async fn create_station(
    State(state): State<AppState>,
    Json(draft): Json<StationDraft>,
) -> Result<impl IntoResponse, GatewayError> {
    let station = state.station_service.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(station)))
}

/// `PUT /stations/:id` — Replace a station's fields.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for an invalid body or
/// [`GatewayError::StationNotFound`] if the station does not exist.
#[utoipa::path(
    put,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    summary = "Update station",
    params(
        ("id" = i32, Path, description = "Station id"),
    ),
    request_body = StationDraft,
    responses(
        (status = 200, description = "Station updated", body = Station),
        (status = 400, description = "Invalid station", body = ErrorResponse),
        (status = 404, description = "Station not found", body = ErrorResponse),
    )
)]
pub async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<StationDraft>,
) -> Result<impl IntoResponse, GatewayError> {
    let station = state
        .station_service
        .update(StationId::new(id)?, &draft)
        .await?;
    Ok(Json(station))
}

/// `DELETE /stations/:id` — Delete a station.
///
/// # Errors
///
/// Returns [`GatewayError::StationNotFound`] if the station does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    summary = "Delete station",
    description = "Deletes a station and returns the removed record.",
    params(
        ("id" = i32, Path, description = "Station id"),
    ),
    responses(
        (status = 200, description = "Station deleted", body = Station),
        (status = 404, description = "Station not found", body = ErrorResponse),
    )
)]
pub async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    let station = state.station_service.delete(StationId::new(id)?).await?;
    Ok(Json(station))
}

/// Station routes, relative to `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stations", get(list_stations).post(create_station))
        .route(
            "/stations/{id}",
            get(get_station).put(update_station).delete(delete_station),
        )
}
