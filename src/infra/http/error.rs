use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pkblog_api_types::ErrorBody;

use crate::application::error::ErrorReport;
use crate::application::repos::IdentityError;

pub mod messages {
    pub const SYSTEM: &str = "Failed to load system information";
    pub const MEMBERS: &str = "Failed to fetch members";
    pub const MEMBER: &str = "Failed to fetch member";
}

/// JSON error for identity routes.
///
/// The body only ever carries the route's fixed message, so callers cannot
/// distinguish a hidden member from a missing one or an upstream outage.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
    detail: String,
}

impl ApiError {
    pub fn upstream(message: &'static str, error: &IdentityError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message.to_string(),
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message("infra::http::identity", self.status, self.detail)
            .attach(&mut response);
        response
    }
}
