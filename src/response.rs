//! The uniform response body: `{"success": bool, ...}` with the payload keys
//! flattened next to the flag.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn success(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

impl Envelope<Failure> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            body: Failure {
                error: error.into(),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// No payload beyond the success flag.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Empty {}

#[derive(Serialize, Deserialize, Debug)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct List<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> List<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Failure {
    pub error: String,
}
