//! Layout composition subsystem.
//!
//! # Data Flow
//! ```text
//! Ancestor layout handlers (root → parent)
//!     → fragment.rs (LayoutFragment per handler)
//!     → fold with compose, seeded with identity
//!
//! Leaf view
//!     → ContentValue        → filled inline
//!     → DeferredResponse    → deferred.rs (assign layout → render)
//!     → RawResponse         → passed through untouched
//! ```
//!
//! # Design Decisions
//! - Fragments are plain values; composition never mutates
//! - A deferred body cannot be read until it has been rendered
//! - Layouts only wrap body text; status and headers belong to the leaf

pub mod deferred;
pub mod fragment;
pub mod response;

pub use deferred::{DeferredError, DeferredResponse, RenderState};
pub use fragment::{ContentValue, LayoutFragment, OutletError, DEFAULT_OUTLET};
pub use response::{RawResponse, RenderedResponse};
