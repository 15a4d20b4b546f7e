//! Auth types shared across Docket crates.
//!
//! Provides JWT validation, the refresh-token cookie builders, and the
//! `BearerIdentity` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
