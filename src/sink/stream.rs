//! Sink over a generic output stream.

use crate::config::Config;
use crate::error::Result;
use crate::sink::Sink;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Appends a line terminator after each text write; bytes pass through verbatim.
#[derive(Debug)]
pub struct StreamSink<W> {
    writer: W,
    terminator: String,
}

impl<W: AsyncWrite + Unpin + Send> StreamSink<W> {
    /// Wraps a stream, terminating text writes with CRLF.
    pub fn new(writer: W) -> Self {
        Self::with_terminator(writer, "\r\n")
    }

    /// Wraps a stream with a custom text terminator.
    pub fn with_terminator(writer: W, terminator: impl Into<String>) -> Self {
        Self {
            writer,
            terminator: terminator.into(),
        }
    }

    /// Wraps a stream using the configured text terminator.
    pub fn from_config(writer: W, config: &Config) -> Self {
        Self::with_terminator(writer, config.stream_line_terminator.clone())
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
impl<W: AsyncWrite + Unpin + Send> Sink for StreamSink<W> {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(self.terminator.as_bytes()).await?;
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
