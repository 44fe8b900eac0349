//! HTTP handlers for the ask service.

pub mod ask;
pub mod health;
pub mod metrics;

pub use ask::ask;
pub use health::{health_check, readiness_check};
pub use metrics::metrics;
