use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;
use crate::vehicles::{self, VehicleFields};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list).post(add))
        .route(
            "/vehicles/{id}",
            axum::routing::put(update).delete(delete),
        )
}

#[derive(Deserialize)]
struct VehicleRequest {
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    first_registration: Option<String>,
    #[serde(default)]
    picture_inter1: Option<String>,
    #[serde(default)]
    picture_inter2: Option<String>,
    #[serde(default)]
    picture_exter1: Option<String>,
    #[serde(default)]
    picture_exter2: Option<String>,
}

impl From<VehicleRequest> for VehicleFields {
    fn from(req: VehicleRequest) -> Self {
        VehicleFields {
            make: req.make,
            model: req.model,
            first_registration: req.first_registration,
            picture_inter1: req.picture_inter1,
            picture_inter2: req.picture_inter2,
            picture_exter1: req.picture_exter1,
            picture_exter2: req.picture_exter2,
        }
    }
}

async fn list(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let vehicles = vehicles::list(&state.db, &user.id)?;
    Ok(Json(vehicles).into_response())
}

async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<VehicleRequest>,
) -> AppResult<Response> {
    let vehicle_id = vehicles::add(&state.db, &user.id, &req.into())?;
    Ok((StatusCode::CREATED, Json(json!({ "vehicle_id": vehicle_id }))).into_response())
}

async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(vehicle_id): Path<String>,
    Json(req): Json<VehicleRequest>,
) -> AppResult<Response> {
    vehicles::update(&state.db, &vehicle_id, &user.id, &req.into())?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(vehicle_id): Path<String>,
) -> AppResult<Response> {
    vehicles::delete(&state.db, &vehicle_id, &user.id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
