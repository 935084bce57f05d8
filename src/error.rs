use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::{
    auth::error::AuthError, db::error::DatabaseError, favorites::FavoriteError,
    response::Envelope,
};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error")]
    Database(DatabaseError),

    #[error("Auth error")]
    Auth(AuthError),

    #[error("Favorite error")]
    Favorite(FavoriteError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Operation timed out")]
    Timeout,

    #[error("Other error: {0}")]
    Other(anyhow::Error),
}

impl From<DatabaseError> for Error {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<FavoriteError> for Error {
    fn from(value: FavoriteError) -> Self {
        Self::Favorite(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Envelope::failure(INTERNAL_ERROR_MESSAGE),
    )
        .into_response()
}

/// First human-readable message out of a set of field errors, fields taken in name order.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(_, errors)| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Database(database_error) => {
                tracing::error!(err.msg = %database_error, err.details = ?database_error, "Database Error");

                internal_error()
            }
            Error::Auth(auth_error) => match auth_error {
                AuthError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    Envelope::failure("Unauthorized - Please log in"),
                )
                    .into_response(),
                AuthError::IncorrectCredential => (
                    StatusCode::UNAUTHORIZED,
                    Envelope::failure("Invalid email or password"),
                )
                    .into_response(),
                AuthError::EmailTaken => (
                    StatusCode::CONFLICT,
                    Envelope::failure("Email already registered"),
                )
                    .into_response(),
                AuthError::PasswordError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Password Hash Error");

                    internal_error()
                }
            },
            Error::Favorite(FavoriteError::AlreadyFavorited) => (
                StatusCode::CONFLICT,
                Envelope::failure("Already in favorites"),
            )
                .into_response(),
            Error::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Envelope::failure(format!("{entity} not found")),
            )
                .into_response(),
            Error::Validation(validation_error) => {
                tracing::warn!(err.msg = %validation_error, err.details = ?validation_error, "Validation Error");

                (
                    StatusCode::BAD_REQUEST,
                    Envelope::failure(validation_message(&validation_error)),
                )
                    .into_response()
            }
            Error::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Envelope::failure(message)).into_response()
            }
            Error::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Envelope::failure("Method not allowed"),
            )
                .into_response(),
            Error::Timeout => {
                tracing::error!("Operation timed out");

                internal_error()
            }
            Error::Other(error) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Other Error");

                internal_error()
            }
        }
    }
}
