pub mod analytics;
pub mod api;
pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod sources;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::{IntervalSource, MixError, MixService};
