//! Normalization from raw availability-service payloads to
//! [`pica_core::AvailabilityProgram`].
//!
//! The availability service's payload is loosely typed: the same logical
//! field arrives under several names depending on which upstream system
//! produced the entry, numbers arrive as numbers or strings, and freight
//! pricing is flattened into metric keys. Everything here decodes
//! defensively — an entry that cannot be resolved is dropped, never an
//! error.

pub mod freight;
pub mod normalize;
pub mod probe;

pub use normalize::{normalize_payload, normalize_program};
pub use probe::{decimal_from_value, probe_bool, probe_string, units_from_value};
