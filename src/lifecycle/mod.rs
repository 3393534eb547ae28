//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging → Compile routes → Bind listener
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → axum stops accepting → in-flight requests drain → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Route compilation happens before the listener binds (traffic only when ready)

pub mod signals;

pub use signals::shutdown_signal;
