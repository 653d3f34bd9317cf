//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod exchange_observer;
pub mod llm_gateway;
pub mod relay_transport;
