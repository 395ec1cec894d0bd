use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::catalog;
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/rides/bookable", get(bookable))
}

/// The rides the current user may book. Pruning runs first so expired
/// and fully booked rides never reach the listing.
async fn bookable(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    catalog::prune_expired_or_empty(&state.db)?;
    let listings = catalog::list_bookable(&state.db, &user.id)?;
    Ok(Json(listings).into_response())
}
