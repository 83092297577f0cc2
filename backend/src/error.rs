use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use thiserror::Error;

use crate::upstream::UpstreamError;
use shared::ApiError;

#[derive(Debug, Error)]
pub enum RouteApiError {
    #[error("Please provide both start and end locations")]
    MissingLocations,
    #[error("Could not geocode addresses")]
    Unresolvable,
    #[error("Route not found")]
    NoRoute,
    #[error("upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl RouteApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingLocations | Self::Unresolvable => StatusCode::BAD_REQUEST,
            Self::NoRoute | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Transport failures keep their detail in the logs; the client gets
    /// a generic message.
    fn public_message(&self) -> String {
        match self {
            Self::Upstream(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RouteApiError {
    fn into_response(self) -> Response {
        if let Self::Upstream(ref err) = self {
            tracing::error!("upstream failure: {err}");
        }
        let body = Json(ApiError {
            error: self.public_message(),
        });
        (self.status(), body).into_response()
    }
}
