//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, query)
//!     → router.rs (classify: preflight / 405 / audio / api)
//!     → target.rs (audio only: validate and normalize target)
//!     → matcher.rs (audio host check)
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at compile time; nothing is configurable
//! - Deterministic: same input always yields the same route

pub mod matcher;
pub mod router;
pub mod target;

pub use matcher::{AudioHostMatcher, AUDIO_HOST};
pub use router::{classify, Route, TARGET_PARAM};
pub use target::normalize_target;
