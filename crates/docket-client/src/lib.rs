//! Typed client for the docket API.
//!
//! Auth state lives in an explicit [`Session`] passed to every call. A 401
//! triggers one silent refresh and one replay; a second failure clears the
//! session and returns [`ClientError::SessionExpired`].

pub mod api;
pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::ApiClient;
pub use error::ClientError;
pub use session::Session;
