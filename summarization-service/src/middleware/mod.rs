pub mod client_secret;
pub mod metrics;

pub use client_secret::{Authorized, CLIENT_SECRET_FIELD};
pub use metrics::http_metrics_middleware;
