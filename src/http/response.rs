//! Response translation.
//!
//! # Responsibilities
//! - Turn rendered route responses into axum responses
//! - Map dispatch failures to HTTP status codes
//!
//! # Design Decisions
//! - Unknown paths and missing records become 404
//! - Invalid form submissions become 400
//! - Every other failure is a 500 with a generic body; details go to the log

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::contacts::{FormError, StoreError};
use crate::layout::RenderedResponse;
use crate::routing::{HandlerError, ResolveError};

impl IntoResponse for RenderedResponse {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

fn handler_status(source: &HandlerError) -> StatusCode {
    if source.downcast_ref::<StoreError>().is_some() {
        StatusCode::NOT_FOUND
    } else if source.downcast_ref::<FormError>().is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// The status code a dispatch failure is reported with.
pub fn error_status(err: &ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound { .. } => StatusCode::NOT_FOUND,
        ResolveError::Handler { source, .. } => handler_status(source),
        ResolveError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text response for `status` using its canonical reason.
pub fn status_response(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Error");
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        reason,
    )
        .into_response()
}
