//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events and spans (request ID on every request span)
//!     → logging.rs (subscriber: filter + pretty or JSON output)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the request span

pub mod logging;

pub use logging::init_logging;
