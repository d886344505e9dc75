//! Destinations for the encoded message.
//!
//! A [`Sink`] accepts text lines and raw byte blocks. Two backends exist:
//!
//! - [`TransportSink`] writes exactly what it is given; the caller frames lines.
//!   Use it for a live connection already in the SMTP DATA phase.
//! - [`StreamSink`] appends a line terminator after every text write and is
//!   meant for diagnostics output.
//!
//! Both retry short writes until the whole buffer is accepted and fail on the
//! first unrecoverable error.

pub mod stream;
pub mod transport;

pub use stream::StreamSink;
pub use transport::TransportSink;

use crate::error::Result;
use async_trait::async_trait;

/// Byte destination for an encoded message.
#[async_trait]
pub trait Sink: Send {
    /// Writes a text fragment.
    async fn write_text(&mut self, text: &str) -> Result<()>;

    /// Writes a raw byte block verbatim.
    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flushes buffered output to the underlying destination.
    async fn flush(&mut self) -> Result<()>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for Box<S> {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        (**self).write_text(text).await
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes).await
    }

    async fn flush(&mut self) -> Result<()> {
        (**self).flush().await
    }
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for &mut S {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        (**self).write_text(text).await
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes).await
    }

    async fn flush(&mut self) -> Result<()> {
        (**self).flush().await
    }
}
