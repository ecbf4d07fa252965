//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → connect timeout (reqwest client)
//!     → timeouts.rs (bound the wait for response headers)
//!     → On failure: 502 / 504 to the client, never retried
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline for its headers
//! - No retries: upstream statuses are relayed verbatim

pub mod timeouts;

pub use timeouts::with_header_timeout;
