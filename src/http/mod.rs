//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (add request ID, open request span)
//!     → routing::classify (preflight / 405 / audio / api)
//!     → forward (upstream call, header sanitization)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, request_id_layer, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
