//! Request identification and translation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Decode query strings and urlencoded form bodies
//! - Build the `RequestContext` handed to route handlers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID supplied by the client is kept
//! - Form bodies are only decoded for `application/x-www-form-urlencoded`

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, request::Parts, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::{RequestContext, RouterTable};

pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID placed by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

fn decode_pairs(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Translate request head and buffered body into a handler context.
pub fn request_context(parts: &Parts, body: &[u8], router: Arc<RouterTable>) -> RequestContext {
    let query = parts
        .uri
        .query()
        .map(|q| decode_pairs(q.as_bytes()))
        .unwrap_or_default();
    let form = if is_form(&parts.headers) {
        decode_pairs(body)
    } else {
        HashMap::new()
    };

    let mut ctx = RequestContext::new(parts.method.clone(), parts.uri.path())
        .with_query(query)
        .with_form(form)
        .with_router(router);
    if let Some(id) = request_id(&parts.headers) {
        ctx = ctx.with_request_id(id);
    }
    ctx
}
