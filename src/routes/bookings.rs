use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::bookings;
use crate::catalog;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rides/{id}/book", post(book))
        .route("/bookings/mine", get(mine))
        .route("/bookings/{id}", delete(cancel))
}

async fn book(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(ride_id): Path<String>,
) -> AppResult<Response> {
    let booking_id = bookings::book(&state.db, &user.id, &ride_id)?;
    Ok((StatusCode::CREATED, Json(json!({ "booking_id": booking_id }))).into_response())
}

/// Only the booking's holder may cancel it. Unknown ids are a no-op for
/// the caller, so their own already-cancelled bookings still answer 204.
async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(booking_id): Path<String>,
) -> AppResult<Response> {
    bookings::cancel_own(&state.db, &user.id, &booking_id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn mine(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let booked = catalog::list_booked(&state.db, &user.id)?;
    Ok(Json(booked).into_response())
}
