//! Error type shared by the todo handlers.
//!
//! # Design
//! Two fault classes only: a request body that failed JSON decoding (client
//! fault, 422) and anything the store reports (server fault, 500). Store
//! errors are not inspected further — "no row found" on update is
//! deliberately indistinguishable from any other store failure, and the raw
//! error text is the response body in both classes.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be decoded into the expected shape.
    Unprocessable(String),

    /// The store reported a failure while executing the operation.
    Store(sqlx::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unprocessable(msg) => write!(f, "{msg}"),
            ApiError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(err) => {
                tracing::error!(%err, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
