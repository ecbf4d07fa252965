//! Edge reverse proxy for kuwo audio files and the replacement music API.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use forward::Upstream;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
