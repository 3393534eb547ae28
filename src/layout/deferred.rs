//! Render-gated responses.
//!
//! # Responsibilities
//! - Hold raw leaf content until the layout chain is known
//! - Accept exactly one layout assignment
//! - Render once and cache the result
//! - Refuse body reads before rendering
//!
//! # Design Decisions
//! - Lifecycle is an explicit state enum: Created → LayoutAssigned → Rendered
//! - Out-of-order transitions return `DeferredError` instead of panicking
//! - Status and headers are fixed by the leaf and never touched by layouts
//! - A leaf may pick its own layout, which replaces the ancestor chain

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

use crate::layout::fragment::LayoutFragment;

/// Misuse of a deferred response. These indicate engine or handler defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeferredError {
    #[error("response body read before its layout was rendered")]
    LayoutNotRendered,

    #[error("response already has a layout assigned")]
    LayoutAlreadyAssigned,

    #[error("response rendered before a layout was assigned")]
    LayoutNotAssigned,
}

/// Observable lifecycle state of a [`DeferredResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Created,
    LayoutAssigned,
    Rendered,
}

#[derive(Debug)]
enum Stage {
    Created { content: String },
    LayoutAssigned { content: String, layout: LayoutFragment },
    Rendered { body: String },
}

/// A leaf response whose body is wrapped by ancestor layouts before use.
#[derive(Debug)]
pub struct DeferredResponse {
    stage: Stage,
    status: StatusCode,
    headers: HeaderMap,
    preferred: Option<LayoutFragment>,
}

impl DeferredResponse {
    /// Create a `200 OK` HTML response holding raw, unwrapped content.
    pub fn new(content: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        Self {
            stage: Stage::Created {
                content: content.into(),
            },
            status: StatusCode::OK,
            headers,
            preferred: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any previous value for `name`.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Use `layout` instead of the layouts folded from the route chain.
    pub fn with_layout(mut self, layout: LayoutFragment) -> Self {
        self.preferred = Some(layout);
        self
    }

    /// The leaf-chosen layout, if any and not yet consumed.
    pub fn preferred_layout(&self) -> Option<&LayoutFragment> {
        self.preferred.as_ref()
    }

    /// Assign the leaf-chosen layout if there is one, otherwise `chain`.
    pub fn assign_layout_or(&mut self, chain: LayoutFragment) -> Result<(), DeferredError> {
        let layout = self.preferred.take().unwrap_or(chain);
        self.assign_layout(layout)
    }

    pub fn state(&self) -> RenderState {
        match self.stage {
            Stage::Created { .. } => RenderState::Created,
            Stage::LayoutAssigned { .. } => RenderState::LayoutAssigned,
            Stage::Rendered { .. } => RenderState::Rendered,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Assign the folded ancestor layout. Allowed once, before rendering.
    pub fn assign_layout(&mut self, layout: LayoutFragment) -> Result<(), DeferredError> {
        let Stage::Created { content } = &mut self.stage else {
            return Err(DeferredError::LayoutAlreadyAssigned);
        };
        let content = std::mem::take(content);
        self.stage = Stage::LayoutAssigned { content, layout };
        Ok(())
    }

    /// Fill the assigned layout with the content. Later calls return the cached body.
    pub fn render(&mut self) -> Result<&str, DeferredError> {
        match &self.stage {
            Stage::Created { .. } => return Err(DeferredError::LayoutNotAssigned),
            Stage::LayoutAssigned { content, layout } => {
                let body = layout.fill(content);
                self.stage = Stage::Rendered { body };
            }
            Stage::Rendered { .. } => {}
        }
        self.body()
    }

    pub fn body(&self) -> Result<&str, DeferredError> {
        match &self.stage {
            Stage::Rendered { body } => Ok(body),
            _ => Err(DeferredError::LayoutNotRendered),
        }
    }

    /// Consume a rendered response into its transport parts.
    pub fn into_parts(self) -> Result<(StatusCode, HeaderMap, String), DeferredError> {
        match self.stage {
            Stage::Rendered { body } => Ok((self.status, self.headers, body)),
            _ => Err(DeferredError::LayoutNotRendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_render_fails() {
        let mut response = DeferredResponse::new("body");
        assert_eq!(response.state(), RenderState::Created);
        assert_eq!(response.body(), Err(DeferredError::LayoutNotRendered));

        response
            .assign_layout(LayoutFragment::new("<A>", "</A>"))
            .unwrap();
        assert_eq!(response.state(), RenderState::LayoutAssigned);
        assert_eq!(response.body(), Err(DeferredError::LayoutNotRendered));
    }

    #[test]
    fn test_render_fills_layout() {
        let layout = LayoutFragment::new("<A>", "</A>");
        let mut response = DeferredResponse::new("body");
        response.assign_layout(layout.clone()).unwrap();

        assert_eq!(response.render().unwrap(), layout.fill("body"));
        assert_eq!(response.state(), RenderState::Rendered);
        assert_eq!(response.body().unwrap(), "<A>body</A>");
    }

    #[test]
    fn test_render_twice_returns_cached_body() {
        let mut response = DeferredResponse::new("x");
        response.assign_layout(LayoutFragment::new("[", "]")).unwrap();
        let first = response.render().unwrap().to_string();
        let second = response.render().unwrap().to_string();
        assert_eq!(first, "[x]");
        assert_eq!(first, second);
    }

    #[test]
    fn test_layout_assigned_once() {
        let mut response = DeferredResponse::new("x");
        response.assign_layout(LayoutFragment::identity()).unwrap();
        assert_eq!(
            response.assign_layout(LayoutFragment::new("<A>", "</A>")),
            Err(DeferredError::LayoutAlreadyAssigned)
        );

        response.render().unwrap();
        assert_eq!(
            response.assign_layout(LayoutFragment::identity()),
            Err(DeferredError::LayoutAlreadyAssigned)
        );
        assert_eq!(response.body().unwrap(), "x");
    }

    #[test]
    fn test_render_without_layout_fails() {
        let mut response = DeferredResponse::new("x");
        assert_eq!(response.render(), Err(DeferredError::LayoutNotAssigned));
        assert_eq!(response.state(), RenderState::Created);
    }

    #[test]
    fn test_metadata_survives_render() {
        let mut response = DeferredResponse::new("gone")
            .with_status(StatusCode::GONE)
            .with_header(
                HeaderName::from_static("x-leaf"),
                HeaderValue::from_static("1"),
            );
        response.assign_layout(LayoutFragment::new("<A>", "</A>")).unwrap();
        response.render().unwrap();

        let (status, headers, body) = response.into_parts().unwrap();
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(headers["x-leaf"], "1");
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body, "<A>gone</A>");
    }

    #[test]
    fn test_preferred_layout_replaces_chain() {
        let mut response =
            DeferredResponse::new("body").with_layout(LayoutFragment::new("<X>", "</X>"));
        assert_eq!(
            response.preferred_layout(),
            Some(&LayoutFragment::new("<X>", "</X>"))
        );

        response
            .assign_layout_or(LayoutFragment::new("<A>", "</A>"))
            .unwrap();
        assert!(response.preferred_layout().is_none());
        assert_eq!(response.render().unwrap(), "<X>body</X>");
    }

    #[test]
    fn test_chain_used_without_preference() {
        let mut response = DeferredResponse::new("body");
        response
            .assign_layout_or(LayoutFragment::new("<A>", "</A>"))
            .unwrap();
        assert_eq!(response.render().unwrap(), "<A>body</A>");
        assert_eq!(
            response.assign_layout_or(LayoutFragment::identity()),
            Err(DeferredError::LayoutAlreadyAssigned)
        );
    }

    #[test]
    fn test_into_parts_requires_render() {
        let response = DeferredResponse::new("x");
        assert_eq!(
            response.into_parts().unwrap_err(),
            DeferredError::LayoutNotRendered
        );
    }
}
