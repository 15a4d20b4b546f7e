//! Domain types shared across Docket crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Framework-free: serde is the only dependency.

pub mod document;
pub mod id;
pub mod pagination;
pub mod role;
