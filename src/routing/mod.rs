//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteNode tree
//!     → compiler.rs (depth-first walk, reject malformed trees)
//!     → pattern.rs (parse `<type:name>` placeholders)
//!     → Freeze as immutable RouterTable
//!
//! Incoming Request (method, path, query, form)
//!     → router.rs (first matching pattern, typed params)
//!     → resolver.rs (layouts root → leaf, fold, fill leaf)
//!     → Return: RenderedResponse, NotFound or handler error
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path
//! - Deterministic: same path always matches the same route
//! - A node either branches or terminates, never both

pub mod compiler;
pub mod error;
pub mod handler;
pub mod node;
pub mod pattern;
pub mod resolver;
pub mod router;

pub use compiler::{CompileOptions, DispatchEntry, LayoutScope, RouteCompiler};
pub use error::{CompileError, ResolveError, ReverseError};
pub use handler::{
    HandlerError, HandlerResult, LayoutHandler, LeafResult, ParamValue, PathParams,
    RequestContext, ViewHandler,
};
pub use node::RouteNode;
pub use pattern::{ParamKind, PathPattern, PatternError, Segment};
pub use router::{Dispatched, RouterTable};
