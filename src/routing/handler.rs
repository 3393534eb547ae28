//! Handler contracts and the values they receive.
//!
//! # Responsibilities
//! - Define the layout and view handler traits
//! - Carry typed path parameters and request context into handlers
//! - Model a leaf's result as a tagged variant
//!
//! # Design Decisions
//! - Handlers are synchronous; blocking lookups are the transport's concern
//! - Closures implement both traits through blanket impls
//! - Handler errors are boxed and never translated by the engine

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::layout::{ContentValue, DeferredResponse, LayoutFragment, RawResponse};
use crate::routing::error::ReverseError;
use crate::routing::router::RouterTable;

/// Error type returned by handlers. Propagated to the transport unchanged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult<T> = Result<T, HandlerError>;

/// A typed value captured by a path placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(u64),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Str(value) => f.write_str(value),
        }
    }
}

/// Path parameters in capture order (root to leaf).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, ParamValue)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: ParamValue) {
        self.entries.push((name.into(), value));
    }

    pub(crate) fn pop(&mut self) {
        self.entries.pop();
    }

    /// The first `count` captured parameters.
    pub(crate) fn prefix(&self, count: usize) -> PathParams {
        let count = count.min(self.entries.len());
        PathParams {
            entries: self.entries[..count].to_vec(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_int(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            ParamValue::Int(value) => Some(*value),
            ParamValue::Str(_) => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::Str(value) => Some(value),
            ParamValue::Int(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Transport-level request data handlers may need.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub request_id: Option<String>,
    router: Option<Arc<RouterTable>>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_form(mut self, form: HashMap<String, String>) -> Self {
        self.form = form;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach the route table so handlers can build URLs by route name.
    pub fn with_router(mut self, router: Arc<RouterTable>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn form_field(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }

    /// Reverse a named route through the attached route table.
    pub fn reverse<I, K, V>(&self, name: &str, params: I) -> Result<String, ReverseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.router
            .as_ref()
            .ok_or(ReverseError::RouterUnavailable)?
            .reverse(name, params)
    }
}

/// What a leaf view produced.
#[derive(Debug)]
pub enum LeafResult {
    /// Terminal content, filled inline against the folded layout.
    Content(ContentValue),
    /// Content plus metadata, rendered through the deferred lifecycle.
    Deferred(DeferredResponse),
    /// A complete response that is never wrapped by layouts.
    Bypass(RawResponse),
}

impl LeafResult {
    pub fn content(text: impl Into<String>) -> Self {
        LeafResult::Content(ContentValue::new(text))
    }

    pub fn deferred(text: impl Into<String>) -> Self {
        LeafResult::Deferred(DeferredResponse::new(text))
    }
}

impl From<ContentValue> for LeafResult {
    fn from(content: ContentValue) -> Self {
        LeafResult::Content(content)
    }
}

impl From<DeferredResponse> for LeafResult {
    fn from(response: DeferredResponse) -> Self {
        LeafResult::Deferred(response)
    }
}

impl From<RawResponse> for LeafResult {
    fn from(response: RawResponse) -> Self {
        LeafResult::Bypass(response)
    }
}

/// Produces the wrapper a route contributes around its descendants.
pub trait LayoutHandler: Send + Sync {
    fn layout(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LayoutFragment>;
}

impl<F> LayoutHandler for F
where
    F: Fn(&RequestContext, &PathParams) -> HandlerResult<LayoutFragment> + Send + Sync,
{
    fn layout(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LayoutFragment> {
        self(ctx, params)
    }
}

/// Produces the body of a matched route.
pub trait ViewHandler: Send + Sync {
    fn view(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LeafResult>;
}

impl<F> ViewHandler for F
where
    F: Fn(&RequestContext, &PathParams) -> HandlerResult<LeafResult> + Send + Sync,
{
    fn view(&self, ctx: &RequestContext, params: &PathParams) -> HandlerResult<LeafResult> {
        self(ctx, params)
    }
}
