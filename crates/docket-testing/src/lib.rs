//! Test utilities for Docket services.
//!
//! Provides `MockAuth`, which signs bearer tokens the API accepts.
//! Import from dev-dependencies only; never in production code.

pub mod auth;
