//! Layout-composing route dispatch for server-rendered HTML.
//!
//! A tree of [`routing::RouteNode`]s is compiled into a flat
//! [`routing::RouterTable`]. Each entry carries the layouts of its
//! ancestors; at request time their [`layout::LayoutFragment`]s are folded
//! outermost-first and wrapped around whatever the matched view produced.

pub mod config;
pub mod contacts;
pub mod http;
pub mod layout;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use layout::{ContentValue, DeferredResponse, LayoutFragment};
pub use routing::{RouteCompiler, RouteNode, RouterTable};
