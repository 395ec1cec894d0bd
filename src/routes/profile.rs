use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;
use crate::users::{self, ProfileFields};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(show).put(update))
        .route("/profile/picture", put(set_picture))
}

#[derive(Deserialize)]
struct ProfileRequest {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    station: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    driving_license_date: Option<String>,
}

#[derive(Deserialize)]
struct PictureRequest {
    path: String,
}

async fn show(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let profile = users::get(&state.db, &user.id)?;
    Ok(Json(profile).into_response())
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ProfileRequest>,
) -> AppResult<Response> {
    let fields = ProfileFields {
        first_name: req.first_name,
        last_name: req.last_name,
        station: req.station,
        email: req.email,
        phone: req.phone,
        driving_license_date: req.driving_license_date,
    };
    users::update_profile(&state.db, &user.id, &fields)?;
    let profile = users::get(&state.db, &user.id)?;
    Ok(Json(profile).into_response())
}

async fn set_picture(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PictureRequest>,
) -> AppResult<Response> {
    users::set_profile_picture(&state.db, &user.id, &req.path)?;
    let profile = users::get(&state.db, &user.id)?;
    Ok(Json(profile).into_response())
}
