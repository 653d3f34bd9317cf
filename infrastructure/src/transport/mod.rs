//! Transports that carry chat requests from the chat client to the relay

pub mod http;

pub use http::HttpRelayTransport;
