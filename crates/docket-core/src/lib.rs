//! Service plumbing shared by Docket binaries: env config, tracing setup,
//! health checks and request ids.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;
