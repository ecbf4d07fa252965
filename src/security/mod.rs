//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream response:
//!     → headers.rs (allow-list copy, CORS, cache policy)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - No trust in upstream headers: only an allow-list passes
//! - Cookies, server banners and upstream CORS never reach the client

pub mod headers;

pub use headers::{preflight_response, sanitize};
