//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch handler)
//!     → request.rs (request ID, query/form decoding, RequestContext)
//!     → routing::RouterTable::dispatch (match, layouts, view)
//!     → response.rs (RenderedResponse or error → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_context, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{error_status, status_response};
pub use server::{AppState, HttpServer};
