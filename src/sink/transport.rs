//! Sink over a live transport connection.

use crate::error::Result;
use crate::sink::Sink;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes exactly the given text and bytes, with no implicit terminator.
#[derive(Debug)]
pub struct TransportSink<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> TransportSink<W> {
    /// Wraps a connection that is ready to receive message content.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tokio_mime_writer::sink::{Sink, TransportSink};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let stream = tokio::net::TcpStream::connect("127.0.0.1:25").await?;
    /// let mut sink = TransportSink::new(stream);
    /// sink.write_text("Subject: hello\r\n").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Sink for TransportSink<W> {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        Ok(())
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}
