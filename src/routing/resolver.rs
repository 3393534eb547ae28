//! Request-time resolution of a dispatch entry.
//!
//! # Responsibilities
//! - Invoke ancestor layouts root → leaf with their scoped parameters
//! - Fold the fragments with `compose`, seeded with identity
//! - Invoke the leaf and fill its content into the fold
//!
//! # Design Decisions
//! - Sequential and synchronous; each handler runs to completion in turn
//! - Handler errors are wrapped with the route label, never translated
//! - Status and headers come from the leaf only
//! - A deferred leaf's own layout replaces the fold; ancestor layouts
//!   still run first

use crate::layout::{LayoutFragment, RenderedResponse};
use crate::routing::compiler::DispatchEntry;
use crate::routing::error::ResolveError;
use crate::routing::handler::{LeafResult, PathParams, RequestContext};

/// Render `entry` for one request.
pub fn resolve(
    entry: &DispatchEntry,
    ctx: &RequestContext,
    params: &PathParams,
) -> Result<RenderedResponse, ResolveError> {
    let handler_error = |source| ResolveError::Handler {
        route: entry.label().to_string(),
        source,
    };

    let mut layout = LayoutFragment::identity();
    for link in entry.layouts() {
        let scoped = params.prefix(link.visible);
        let fragment = link.handler.layout(ctx, &scoped).map_err(handler_error)?;
        layout = layout.compose(&fragment);
    }

    match entry.view().view(ctx, params).map_err(handler_error)? {
        LeafResult::Content(content) => Ok(RenderedResponse::html(
            layout.fill_content(&content).into_string(),
        )),
        LeafResult::Deferred(mut deferred) => {
            deferred.assign_layout_or(layout)?;
            deferred.render()?;
            let (status, headers, body) = deferred.into_parts()?;
            Ok(RenderedResponse::new(status, headers, body))
        }
        LeafResult::Bypass(raw) => {
            tracing::debug!(route = %entry.label(), status = %raw.status, "Leaf bypassed layouts");
            Ok(raw.into())
        }
    }
}
