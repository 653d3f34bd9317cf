//! Relay transport port
//!
//! The Consumer's view of the network: send a [`ChatRequest`] to the Relay
//! and get back the raw response body as a stream of byte chunks.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use relay_domain::ChatRequest;
use thiserror::Error;

/// Errors raised by a relay transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The Relay answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// The request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Reading the response body failed.
    #[error("Stream error: {0}")]
    Stream(String),
}

/// Raw response body, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Transport that carries chat requests to the Relay
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send `request` and return the response body once the status is known
    /// to be successful.
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, TransportError>;
}
