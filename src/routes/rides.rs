use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::catalog;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::rides;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rides", axum::routing::post(create))
        .route("/rides/mine", get(mine))
        .route("/rides/{id}", get(show).put(update).delete(delete))
        .route("/rides/{id}/passengers", get(passengers))
}

#[derive(Deserialize)]
struct RideRequest {
    start_location: String,
    destination: String,
    date: String,
    time: String,
    seats: i64,
}

async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<RideRequest>,
) -> AppResult<Response> {
    let ride_id = rides::create(
        &state.db,
        &user.id,
        &req.start_location,
        &req.destination,
        &req.date,
        &req.time,
        req.seats,
    )?;

    Ok((StatusCode::CREATED, Json(json!({ "ride_id": ride_id }))).into_response())
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(ride_id): Path<String>,
) -> AppResult<Response> {
    let ride = rides::get(&state.db, &ride_id)?;
    Ok(Json(ride).into_response())
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<String>,
    Json(req): Json<RideRequest>,
) -> AppResult<Response> {
    rides::update(
        &state.db,
        &ride_id,
        &user.id,
        &req.start_location,
        &req.destination,
        &req.date,
        &req.time,
        req.seats,
    )?;
    let ride = rides::get(&state.db, &ride_id)?;
    Ok(Json(ride).into_response())
}

async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<String>,
) -> AppResult<Response> {
    rides::delete(&state.db, &ride_id, &user.id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// The provider's own offered rides, past ones included.
async fn mine(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let offered = catalog::list_offered(&state.db, &user.id)?;
    Ok(Json(offered).into_response())
}

/// Who booked a seat on one of the provider's rides.
async fn passengers(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<String>,
) -> AppResult<Response> {
    // Only the provider gets the passenger contact list
    let ride = rides::get(&state.db, &ride_id)?;
    if ride.provider_id != user.id {
        return Err(crate::error::AppError::Unauthorized);
    }

    let passengers = catalog::passengers(&state.db, &ride_id)?;
    Ok(Json(passengers).into_response())
}
