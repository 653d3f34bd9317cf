//! Live rendering of a running exchange

pub mod reporter;
