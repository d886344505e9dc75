//! Single-pass message writer.
//!
//! Walks a [`Message`] in document order and streams it to a [`Sink`]:
//! headers, then the body section, then every attachment, each wrapped in
//! the multipart envelopes its position requires. Nothing is assembled in
//! memory beyond one encoded payload at a time, and the first failing write
//! aborts the send.

use crate::config::Config;
use crate::encoding::ContentEncoder;
use crate::error::Result;
use crate::message::{Attachment, Message};
use crate::multipart::{BoundaryGenerator, Envelope, MultipartKind, UuidBoundaries};
use crate::sink::{Sink, TransportSink};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Headers of the embedded plain-text part, including the blank line.
pub const PLAIN_TEXT_HEADERS: &str = "CONTENT-TYPE: text/plain; charset=utf-8\r\n\
    CONTENT-TRANSFER-ENCODING: 7bit\r\n\
    CONTENT-DISPOSITION: inline\r\n\r\n";

/// Headers of the PGP/MIME version part, including the blank line.
pub const PGP_CONTENT_HEADERS: &str = "CONTENT-TYPE: application/pgp-encrypted\r\n\
    CONTENT-DESCRIPTION: PGP/MIME version identification\r\n\r\n";

const CRLF: &str = "\r\n";

type WriteFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Streams messages as MIME to a sink.
pub struct MessageWriter<S> {
    sink: S,
    encoder: ContentEncoder,
    boundaries: Arc<dyn BoundaryGenerator>,
}

impl<S: Sink> MessageWriter<S> {
    /// Creates a writer with a private encoder and random boundaries.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tokio_mime_writer::{Message, MessageWriter};
    /// use tokio_mime_writer::sink::TransportSink;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let stream = tokio::net::TcpStream::connect("127.0.0.1:25").await?;
    /// // ... SMTP session reaches the DATA phase ...
    /// let mut writer = MessageWriter::new(TransportSink::new(stream));
    /// writer.send(&Message::new("Subject: hi\r\n", "Hello")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            encoder: ContentEncoder::new(),
            boundaries: Arc::new(UuidBoundaries),
        }
    }

    /// Creates a writer whose encoder follows the configuration.
    pub fn from_config(sink: S, config: &Config) -> Result<Self> {
        Ok(Self::new(sink).with_encoder(ContentEncoder::from_config(config)?))
    }

    /// Replaces the encoder, e.g. with one sharing a cache with other writers.
    pub fn with_encoder(mut self, encoder: ContentEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Replaces the boundary source.
    pub fn with_boundaries(mut self, boundaries: impl BoundaryGenerator + 'static) -> Self {
        self.boundaries = Arc::new(boundaries);
        self
    }

    /// Returns the encoder.
    pub fn encoder(&self) -> &ContentEncoder {
        &self.encoder
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unwraps the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Writes a message including its headers.
    pub async fn send(&mut self, message: &Message) -> Result<()> {
        self.send_with(message, true).await
    }

    /// Writes a message, optionally leaving out its header block.
    ///
    /// Errors from the sink or from reading file attachments abort the send
    /// immediately; whatever was written before is not a valid message.
    pub async fn send_with(&mut self, message: &Message, include_headers: bool) -> Result<()> {
        tracing::debug!(
            attachments = message.attachments.len(),
            alternative = message.alternative.is_some(),
            pgp = message.is_pgp,
            include_headers,
            "sending message content"
        );

        if include_headers {
            self.sink.write_text(&message.headers).await?;
        }

        if message.has_attachment() {
            self.write_multipart(message).await?;
        } else {
            self.write_plain_text(&message.text).await?;
        }

        self.sink.flush().await?;
        tracing::debug!("message content sent");
        Ok(())
    }

    async fn write_multipart(&mut self, message: &Message) -> Result<()> {
        let kind = if message.is_pgp {
            MultipartKind::Encrypted
        } else {
            MultipartKind::Mixed
        };
        let mut outer = Envelope::new(kind, self.boundaries.next_boundary());
        outer.open(&mut self.sink).await?;

        if !message.is_pgp || !message.text.is_empty() {
            outer.start_part(&mut self.sink).await?;
        }
        self.write_alternative(message).await?;

        for attachment in &message.attachments {
            outer.start_part(&mut self.sink).await?;
            self.write_attachment(attachment).await?;
        }

        outer.close(&mut self.sink).await
    }

    async fn write_alternative(&mut self, message: &Message) -> Result<()> {
        if let Some(alternative) = &message.alternative {
            let mut envelope =
                Envelope::new(MultipartKind::Alternative, self.boundaries.next_boundary());
            envelope.open(&mut self.sink).await?;
            envelope.start_part(&mut self.sink).await?;
            self.write_plain_text(&message.text).await?;
            envelope.start_part(&mut self.sink).await?;
            self.write_attachment(alternative).await?;
            envelope.close(&mut self.sink).await
        } else if message.is_pgp {
            if message.text.is_empty() {
                return Ok(());
            }
            self.sink.write_text(PGP_CONTENT_HEADERS).await?;
            self.sink.write_text(&message.text).await?;
            self.sink.write_text(CRLF).await
        } else {
            self.write_plain_text(&message.text).await
        }
    }

    async fn write_plain_text(&mut self, text: &str) -> Result<()> {
        self.sink.write_text(PLAIN_TEXT_HEADERS).await?;
        self.sink.write_text(text).await?;
        self.sink.write_text(CRLF).await
    }

    // Boxed because attachments nest through their related parts.
    fn write_attachment<'a>(&'a mut self, attachment: &'a Attachment) -> WriteFuture<'a> {
        Box::pin(async move {
            tracing::debug!(
                kind = attachment.payload.kind(),
                related = attachment.related.len(),
                "writing attachment"
            );

            if !attachment.has_related() {
                return self.write_part(attachment).await;
            }

            let mut related =
                Envelope::new(MultipartKind::Related, self.boundaries.next_boundary());
            related.open(&mut self.sink).await?;
            related.start_part(&mut self.sink).await?;
            self.write_part(attachment).await?;

            for child in &attachment.related {
                related.start_part(&mut self.sink).await?;
                self.write_attachment(child).await?;
            }

            related.close(&mut self.sink).await
        })
    }

    async fn write_part(&mut self, attachment: &Attachment) -> Result<()> {
        self.sink.write_text(&attachment.header).await?;
        self.sink.write_text(CRLF).await?;
        let content = self.encoder.encode(&attachment.payload).await?;
        self.sink.write_bytes(&content).await?;
        self.sink.write_text(CRLF).await
    }
}

impl MessageWriter<TransportSink<Vec<u8>>> {
    /// Creates a writer collecting output in memory.
    pub fn in_memory() -> Self {
        Self::new(TransportSink::new(Vec::new()))
    }

    /// Takes the bytes written so far.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(self.sink.get_mut())
    }
}

/// Renders a message to memory exactly as it would go over a transport.
pub async fn render(message: &Message) -> Result<Vec<u8>> {
    let mut writer = MessageWriter::in_memory();
    writer.send(message).await?;
    Ok(writer.into_inner().into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::multipart::SequentialBoundaries;
    use crate::sink::StreamSink;

    const HEADERS: &str = "From: alice@example.com\r\nTo: bob@example.com\r\nSubject: Hi\r\n";
    const PDF_HEADER: &str = "Content-Type: application/pdf\r\nContent-Transfer-Encoding: base64\r\n";

    fn writer() -> MessageWriter<TransportSink<Vec<u8>>> {
        MessageWriter::in_memory().with_boundaries(SequentialBoundaries::new("b").unwrap())
    }

    async fn output(message: &Message, include_headers: bool) -> String {
        let mut writer = writer();
        writer.send_with(message, include_headers).await.unwrap();
        String::from_utf8(writer.take_output()).unwrap()
    }

    fn plain(text: &str) -> String {
        format!("{PLAIN_TEXT_HEADERS}{text}\r\n")
    }

    #[tokio::test]
    async fn test_plain_message() {
        let msg = Message::new(HEADERS, "Hello");
        assert_eq!(
            output(&msg, true).await,
            format!(
                "{HEADERS}CONTENT-TYPE: text/plain; charset=utf-8\r\n\
                 CONTENT-TRANSFER-ENCODING: 7bit\r\n\
                 CONTENT-DISPOSITION: inline\r\n\r\nHello\r\n"
            )
        );
        assert_eq!(output(&msg, false).await, plain("Hello"));
    }

    #[tokio::test]
    async fn test_single_attachment() {
        let msg = Message::new(HEADERS, "Hello")
            .with_attachment(Attachment::bytes(PDF_HEADER, &b"%PDF-1.4 test"[..]));
        assert_eq!(
            output(&msg, true).await,
            format!(
                "{HEADERS}CONTENT-TYPE: multipart/mixed; boundary=b0\r\n\r\n\
                 --b0\r\n{}\
                 --b0\r\n{PDF_HEADER}\r\nJVBERi0xLjQgdGVzdA==\r\n\
                 --b0--\r\n",
                plain("Hello")
            )
        );
    }

    #[tokio::test]
    async fn test_alternative_with_related_images() {
        let html = Attachment::html("Content-Type: text/html\r\n", "<p>Hello</p>")
            .with_related(Attachment::bytes("Content-ID: <logo>\r\n", &b"\x89PNG\r\n"[..]));
        let msg = Message::new("", "Hello")
            .with_alternative(html)
            .with_attachment(Attachment::pgp("Content-Type: text/plain\r\n", "key"));

        assert_eq!(
            output(&msg, false).await,
            format!(
                "CONTENT-TYPE: multipart/mixed; boundary=b0\r\n\r\n\
                 --b0\r\n\
                 CONTENT-TYPE: multipart/alternative; boundary=b1\r\n\r\n\
                 --b1\r\n{}\
                 --b1\r\n\
                 CONTENT-TYPE: multipart/related; boundary=b2\r\n\r\n\
                 --b2\r\nContent-Type: text/html\r\n\r\nPHA+SGVsbG88L3A+\r\n\
                 --b2\r\nContent-ID: <logo>\r\n\r\niVBORw0K\r\n\
                 --b2--\r\n\
                 --b1--\r\n\
                 --b0\r\nContent-Type: text/plain\r\n\r\nkey\r\n\
                 --b0--\r\n",
                plain("Hello")
            )
        );
    }

    #[tokio::test]
    async fn test_alternative_without_attachments_still_wraps() {
        let msg = Message::new("", "Hi")
            .with_alternative(Attachment::html("Content-Type: text/html\r\n", "<p>Hello</p>"));
        let out = output(&msg, false).await;
        assert!(out.starts_with("CONTENT-TYPE: multipart/mixed; boundary=b0\r\n\r\n--b0\r\n"));
        assert!(out.ends_with("--b1--\r\n--b0--\r\n"));
        assert_eq!(out.matches("--b0\r\n").count(), 1);
    }

    #[tokio::test]
    async fn test_pgp_message() {
        let armored = "-----BEGIN PGP MESSAGE-----\r\n\r\nhQEMA\r\n-----END PGP MESSAGE-----";
        let msg = Message::new("", "Version: 1")
            .with_attachment(Attachment::pgp(
                "Content-Type: application/octet-stream; name=\"encrypted.asc\"\r\n",
                armored,
            ))
            .pgp();

        assert_eq!(
            output(&msg, false).await,
            format!(
                "CONTENT-TYPE: multipart/encrypted; protocol=\"application/pgp-encrypted\"; boundary=b0\r\n\r\n\
                 --b0\r\n{PGP_CONTENT_HEADERS}Version: 1\r\n\
                 --b0\r\nContent-Type: application/octet-stream; name=\"encrypted.asc\"\r\n\r\n{armored}\r\n\
                 --b0--\r\n"
            )
        );
    }

    #[tokio::test]
    async fn test_pgp_with_empty_text_skips_body() {
        let msg = Message::new("", "")
            .with_attachment(Attachment::pgp("X-Part: 1\r\n", "armor"))
            .pgp();
        assert_eq!(
            output(&msg, false).await,
            "CONTENT-TYPE: multipart/encrypted; protocol=\"application/pgp-encrypted\"; boundary=b0\r\n\r\n\
             --b0\r\nX-Part: 1\r\n\r\narmor\r\n\
             --b0--\r\n"
        );
    }

    #[tokio::test]
    async fn test_pgp_alternative_takes_precedence() {
        let msg = Message::new("", "Version: 1")
            .with_alternative(Attachment::html("Content-Type: text/html\r\n", "<p>Hello</p>"))
            .pgp();
        let out = output(&msg, false).await;
        assert!(out.contains("multipart/alternative"));
        assert!(!out.contains(PGP_CONTENT_HEADERS));
        assert!(out.contains(&plain("Version: 1")));
    }

    #[tokio::test]
    async fn test_nested_related_order() {
        let leaf = |n: u8| Attachment::bytes(format!("X-Leaf: {n}\r\n"), vec![n]);
        let inner = Attachment::html("X-Inner: 1\r\n", "i").with_related(leaf(1)).with_related(leaf(2));
        let outer = Attachment::html("X-Outer: 1\r\n", "o")
            .with_related(inner)
            .with_related(leaf(3));
        let msg = Message::new("", "t").with_attachment(outer);

        let out = output(&msg, false).await;
        let order: Vec<_> = ["X-Outer", "X-Inner", "X-Leaf: 1", "X-Leaf: 2", "X-Leaf: 3"]
            .iter()
            .map(|h| out.find(h).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));

        // b0 mixed, b1 outer related, b2 inner related.
        assert_eq!(out.matches("--b1\r\n").count(), 3);
        assert_eq!(out.matches("--b2\r\n").count(), 3);
        assert_eq!(out.matches("--b1--\r\n").count(), 1);
        assert_eq!(out.matches("--b2--\r\n").count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_aborts_send() {
        let msg = Message::new("", "Hello")
            .with_attachment(Attachment::file(PDF_HEADER, "/no/such/report.pdf"))
            .with_attachment(Attachment::bytes(PDF_HEADER, &b"never written"[..]));
        let mut writer = writer();
        let err = writer.send(&msg).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { ref path } if path.ends_with("report.pdf")));

        let partial = String::from_utf8(writer.take_output()).unwrap();
        assert!(partial.ends_with(&format!("--b0\r\n{PDF_HEADER}\r\n")));
        assert!(!partial.contains("--b0--"));
    }

    #[tokio::test]
    async fn test_stream_sink_terminates_text_writes() {
        let mut writer = MessageWriter::new(StreamSink::with_terminator(Vec::new(), "\n"));
        writer.send_with(&Message::new("", "Hi"), false).await.unwrap();
        let out = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(out, format!("{PLAIN_TEXT_HEADERS}\nHi\n\r\n\n"));
    }

    #[tokio::test]
    async fn test_random_boundaries_are_fresh_per_envelope() {
        let msg = Message::new("", "Hello")
            .with_alternative(Attachment::html("", "<p>x</p>"))
            .with_attachment(Attachment::bytes("", vec![1u8]));
        let out = String::from_utf8(render(&msg).await.unwrap()).unwrap();
        let boundaries: Vec<_> = out
            .lines()
            .filter_map(|l| l.split("boundary=").nth(1))
            .collect();
        assert_eq!(boundaries.len(), 2);
        assert_ne!(boundaries[0], boundaries[1]);
        assert!(boundaries.iter().all(|b| b.len() == 32));
    }
}
