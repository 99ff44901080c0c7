//! HTTP client for the remote campaign booking API.
//!
//! The campaign service is an external collaborator: this crate owns the
//! transport, auth header, and defensive decoding, and hands loose
//! availability payloads to `pica_availability` for normalization.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::AvailabilityRequest;
