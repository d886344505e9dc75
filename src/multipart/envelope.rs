//! Multipart envelope framing.
//!
//! Implements RFC 2046 envelope generation: one header line announcing the
//! boundary, a delimiter line before each part and a close delimiter after
//! the last one. Parts themselves are written by the caller between
//! delimiters.

use crate::error::Result;
use crate::multipart::boundary::Boundary;
use crate::sink::Sink;
use std::fmt;

/// The multipart subtypes this writer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartKind {
    /// Independent parts: the body followed by attachments.
    Mixed,
    /// Interchangeable renderings of the same content.
    Alternative,
    /// Interdependent parts, e.g. HTML with embedded images.
    Related,
    /// PGP/MIME encrypted content (RFC 3156).
    Encrypted,
}

impl MultipartKind {
    /// Returns the MIME subtype.
    pub fn subtype(&self) -> &'static str {
        match self {
            MultipartKind::Mixed => "mixed",
            MultipartKind::Alternative => "alternative",
            MultipartKind::Related => "related",
            MultipartKind::Encrypted => "encrypted",
        }
    }
}

impl fmt::Display for MultipartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multipart/{}", self.subtype())
    }
}

/// One open multipart envelope.
///
/// The boundary lives exactly as long as the envelope and is never reused.
#[derive(Debug)]
pub struct Envelope {
    kind: MultipartKind,
    boundary: Boundary,
    parts: usize,
}

impl Envelope {
    /// Creates an envelope; nothing is written until [`Envelope::open`].
    pub fn new(kind: MultipartKind, boundary: Boundary) -> Self {
        Self {
            kind,
            boundary,
            parts: 0,
        }
    }

    /// Returns the envelope's subtype.
    pub fn kind(&self) -> MultipartKind {
        self.kind
    }

    /// Returns the envelope's boundary.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Returns the number of delimiter lines written so far.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Returns the Content-Type header block, including the blank line ending it.
    pub fn content_type(&self) -> String {
        match self.kind {
            MultipartKind::Encrypted => format!(
                "CONTENT-TYPE: {}; protocol=\"application/pgp-encrypted\"; boundary={}\r\n\r\n",
                self.kind,
                self.boundary.param_value()
            ),
            _ => format!(
                "CONTENT-TYPE: {}; boundary={}\r\n\r\n",
                self.kind,
                self.boundary.param_value()
            ),
        }
    }

    /// Returns the delimiter line preceding each part.
    pub fn delimiter(&self) -> String {
        format!("--{}\r\n", self.boundary)
    }

    /// Returns the close delimiter line ending the envelope.
    pub fn close_delimiter(&self) -> String {
        format!("--{}--\r\n", self.boundary)
    }

    /// Writes the envelope's Content-Type header.
    pub async fn open<S: Sink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        tracing::debug!(kind = %self.kind, boundary = %self.boundary, "opening envelope");
        sink.write_text(&self.content_type()).await
    }

    /// Writes a delimiter line; the caller then writes the part.
    pub async fn start_part<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        sink.write_text(&self.delimiter()).await?;
        self.parts += 1;
        Ok(())
    }

    /// Writes the close delimiter, consuming the envelope.
    pub async fn close<S: Sink + ?Sized>(self, sink: &mut S) -> Result<()> {
        tracing::debug!(
            kind = %self.kind,
            boundary = %self.boundary,
            parts = self.parts,
            "closing envelope"
        );
        sink.write_text(&self.close_delimiter()).await
    }
}
