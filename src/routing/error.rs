//! Routing error taxonomy.

use thiserror::Error;

use crate::layout::DeferredError;
use crate::routing::handler::HandlerError;
use crate::routing::pattern::PatternError;

/// A malformed route tree. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("route `{path}` has both a view and child routes")]
    AmbiguousRoute { path: String },

    #[error("route `{path}` has no view and no children and can never be dispatched")]
    UnreachableRoute { path: String },

    #[error("route name `{name}` is used more than once")]
    DuplicateRouteName { name: String },

    #[error("invalid path pattern `{path}`: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: PatternError,
    },

    #[error("parameter `{name}` is captured more than once in `{path}`")]
    DuplicateParameter { name: String, path: String },
}

/// Failure while serving a request through the route table.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no route matches `{path}`")]
    NotFound { path: String },

    #[error("handler for route `{route}` failed: {source}")]
    Handler {
        route: String,
        #[source]
        source: HandlerError,
    },

    #[error(transparent)]
    Render(#[from] DeferredError),
}

/// Reverse lookup failures. Recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    #[error("no route named `{0}`")]
    RouteNotFound(String),

    #[error("route `{route}` requires parameter `{name}`")]
    MissingParameter { route: String, name: String },

    #[error("value `{value}` is not a valid `{kind}` for parameter `{name}` of route `{route}`")]
    InvalidParameter {
        route: String,
        name: String,
        kind: &'static str,
        value: String,
    },

    #[error("no route table attached to this request")]
    RouterUnavailable,
}
