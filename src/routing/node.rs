//! Route tree nodes.
//!
//! A node either branches (children, optional layout) or terminates (a view).
//! The compiler rejects nodes that try to do both.

use std::fmt;
use std::sync::Arc;

use crate::layout::LayoutFragment;
use crate::routing::handler::{
    HandlerResult, LayoutHandler, LeafResult, PathParams, RequestContext, ViewHandler,
};

/// One segment of the route tree.
pub struct RouteNode {
    pub(crate) path: String,
    pub(crate) layout: Option<Arc<dyn LayoutHandler>>,
    pub(crate) view: Option<Arc<dyn ViewHandler>>,
    pub(crate) children: Vec<RouteNode>,
    pub(crate) name: Option<String>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            layout: None,
            view: None,
            children: Vec::new(),
            name: None,
        }
    }

    /// A node with an empty path segment.
    pub fn root() -> Self {
        Self::new("")
    }

    pub fn layout<F>(self, handler: F) -> Self
    where
        F: Fn(&RequestContext, &PathParams) -> HandlerResult<LayoutFragment>
            + Send
            + Sync
            + 'static,
    {
        self.layout_with(handler)
    }

    pub fn layout_with(mut self, handler: impl LayoutHandler + 'static) -> Self {
        self.layout = Some(Arc::new(handler));
        self
    }

    pub fn view<F>(self, handler: F) -> Self
    where
        F: Fn(&RequestContext, &PathParams) -> HandlerResult<LeafResult> + Send + Sync + 'static,
    {
        self.view_with(handler)
    }

    pub fn view_with(mut self, handler: impl ViewHandler + 'static) -> Self {
        self.view = Some(Arc::new(handler));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn child(mut self, child: RouteNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("layout", &self.layout.is_some())
            .field("view", &self.view.is_some())
            .field("children", &self.children)
            .finish()
    }
}
