//! Application-level configuration.
//!
//! - [`RelayParams`]: model and streaming deadline for the Relay

pub mod relay_params;

pub use relay_params::RelayParams;
