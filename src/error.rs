use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::session::SessionError;
use crate::bookings::BookingError;
use crate::catalog::CatalogError;
use crate::rides::RideError;
use crate::users::UserError;
use crate::vehicles::VehicleError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::RideNotFound => AppError::NotFound,
            BookingError::NotOwner => AppError::Unauthorized,
            BookingError::NoSeatsAvailable | BookingError::DuplicateBooking => {
                AppError::Conflict(err.to_string())
            }
            BookingError::Sql(e) => AppError::Database(e),
            BookingError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Sql(e) => AppError::Database(e),
            CatalogError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Sql(e) => AppError::Database(e),
            SessionError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl From<VehicleError> for AppError {
    fn from(err: VehicleError) -> Self {
        match err {
            VehicleError::NotFound => AppError::NotFound,
            VehicleError::NotOwner => AppError::Unauthorized,
            VehicleError::Sql(e) => AppError::Database(e),
            VehicleError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl From<RideError> for AppError {
    fn from(err: RideError) -> Self {
        match err {
            RideError::NotFound => AppError::NotFound,
            RideError::NotOwner => AppError::Unauthorized,
            RideError::Validation(msg) => AppError::BadRequest(msg),
            RideError::Sql(e) => AppError::Database(e),
            RideError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound,
            UserError::UsernameTaken => AppError::Conflict(err.to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized,
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Hash(e) => AppError::Internal(e.to_string()),
            UserError::Sql(e) => AppError::Database(e),
            UserError::Pool(e) => AppError::Pool(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
