use axum::extract::{FromRequest, FromRequestParts};

use crate::error::Error;

pub mod auth;
pub mod dramas;
pub mod episodes;
pub mod favorites;
pub mod home;

/// `axum::Json` whose rejection renders as a 400 envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);

/// Query and body strings that are present but blank count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
