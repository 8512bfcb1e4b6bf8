//! REST API routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::persistence::{AcquireOutcome, InsertOutcome, StoreError};
use crate::state::AppState;
use fleet_core::Drone;

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/drones", get(list_drones))
        .route("/v1/drones", post(add_drone))
        .route("/v1/drones/:drone_id", get(get_drone))
        .route("/v1/drones/:drone_id", put(update_drone))
        .route("/v1/drones/:drone_id", delete(remove_drone))
        .route("/v1/drones/:drone_id/control", get(get_control_status))
        .route("/v1/drones/:drone_id/control", post(acquire_control))
        .route("/v1/drones/:drone_id/release", post(release_control))
}

// === Request types ===

#[derive(Debug, Deserialize)]
pub struct ListDronesQuery {
    /// Column to sort by; must name a drone column.
    pub order_by: Option<String>,
    /// When false, identifiers are stripped from the listing.
    pub include_id: Option<bool>,
}

// === Handlers ===

async fn list_drones(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDronesQuery>,
) -> Result<Json<Vec<Drone>>, ErrorResponse> {
    let order_by = resolve_order_by(query.order_by.as_deref())?;

    let drones = if query.include_id.unwrap_or(true) {
        state.repository().list_all_with_identity(order_by).await
    } else {
        state.repository().list_all(order_by).await
    }
    .map_err(storage_failure)?;

    Ok(Json(drones))
}

async fn add_drone(
    State(state): State<Arc<AppState>>,
    Json(drone): Json<Drone>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut drone = drone;
    if drone.id.is_none() {
        match state.repository().next_identity().await {
            Ok(id) => drone.id = Some(id),
            Err(err) => return storage_failure(err),
        }
    }

    match state.repository().add(&mut drone).await {
        Ok(InsertOutcome::Inserted { id }) => {
            tracing::info!("Registered drone {}", id);
            (StatusCode::CREATED, Json(json!({ "id": id })))
        }
        Ok(InsertOutcome::DuplicateIgnored) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Drone already exists",
                "hint": "A row with this identifier is already registered"
            })),
        ),
        Err(err) => storage_failure(err),
    }
}

async fn get_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
) -> Result<Json<Drone>, ErrorResponse> {
    state
        .repository()
        .get_by_id(drone_id)
        .await
        .map_err(storage_failure)?
        .map(Json)
        .ok_or_else(|| not_found(drone_id))
}

async fn update_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
    Json(fields): Json<BTreeMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let fields: Vec<(String, String)> = fields.into_iter().collect();
    match state.repository().update(drone_id, &fields).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "id": drone_id }))),
        Err(err) => {
            // Unknown column names surface here as store rejections.
            tracing::warn!("Update of drone {} rejected: {}", drone_id, err);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Update rejected by store" })),
            )
        }
    }
}

async fn remove_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
) -> Result<StatusCode, ErrorResponse> {
    state
        .repository()
        .remove(drone_id)
        .await
        .map_err(storage_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_control_status(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let status = state
        .repository()
        .control_status(drone_id)
        .await
        .map_err(storage_failure)?
        .ok_or_else(|| not_found(drone_id))?;

    Ok(Json(json!({
        "drone_id": drone_id,
        "status": status.as_str(),
    })))
}

async fn acquire_control(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.repository().acquire_control(drone_id).await {
        Ok(AcquireOutcome::Acquired) => (
            StatusCode::OK,
            Json(json!({
                "drone_id": drone_id,
                "status": "locked",
            })),
        ),
        Ok(AcquireOutcome::Unavailable) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": format!("Drone {} is controlled by another operator", drone_id),
            })),
        ),
        Err(err) => storage_failure(err),
    }
}

async fn release_control(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<i64>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.repository().release_control(drone_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "drone_id": drone_id,
                "status": "released",
            })),
        ),
        Err(err) => storage_failure(err),
    }
}

// === Helpers ===

/// Map a requested sort column onto the known column list.
///
/// The resolved name is interpolated into ORDER BY as raw text, so only
/// names from `Drone::COLUMNS` may pass.
fn resolve_order_by(requested: Option<&str>) -> Result<&'static str, ErrorResponse> {
    match requested {
        None => Ok("id"),
        Some(requested) => Drone::COLUMNS
            .iter()
            .find(|column| **column == requested)
            .copied()
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Unknown order_by column" })),
                )
            }),
    }
}

fn not_found(drone_id: i64) -> ErrorResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No drone with id {}", drone_id) })),
    )
}

fn storage_failure(err: StoreError) -> ErrorResponse {
    tracing::error!("Store failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Storage failure" })),
    )
}
