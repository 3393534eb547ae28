//! Transport-ready responses leaving the layout engine.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::http::header::InvalidHeaderValue;

/// A complete response a leaf hands straight to the transport, skipping layouts.
///
/// Used for redirects and method errors where wrapping the body makes no sense.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// `303 See Other` pointing at `location`.
    pub fn see_other(location: &str) -> Result<Self, InvalidHeaderValue> {
        let mut response = Self::new(StatusCode::SEE_OTHER, "");
        response
            .headers
            .insert(header::LOCATION, HeaderValue::from_str(location)?);
        Ok(response)
    }

    pub fn method_not_allowed(allow: &'static str) -> Self {
        let mut response = Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        response
            .headers
            .insert(header::ALLOW, HeaderValue::from_static(allow));
        response
    }
}

/// The fully rendered output of one resolution.
#[derive(Debug, Clone)]
pub struct RenderedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl RenderedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: String) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A `200 OK` HTML page.
    pub fn html(body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        Self::new(StatusCode::OK, headers, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, String) {
        (self.status, self.headers, self.body)
    }
}

impl From<RawResponse> for RenderedResponse {
    fn from(raw: RawResponse) -> Self {
        Self::new(raw.status, raw.headers, raw.body)
    }
}
