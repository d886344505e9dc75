//! Message and attachment values handed to the writer.
//!
//! Header strings arrive pre-rendered; the writer only adds envelope
//! `CONTENT-TYPE` lines and boundary framing around them.

use bytes::Bytes;
use std::path::PathBuf;

/// The content of an attachment, tagged by how it is put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// In-memory bytes, base64 encoded.
    Bytes(Bytes),
    /// ASCII-armored PGP text, written as-is.
    Pgp(String),
    /// A file read fully at send time, base64 encoded.
    File(PathBuf),
    /// Inline HTML text, base64 encoded.
    Html(String),
}

impl Payload {
    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Bytes(_) => "bytes",
            Payload::Pgp(_) => "pgp",
            Payload::File(_) => "file",
            Payload::Html(_) => "html",
        }
    }
}

/// A single attachment with its own header block.
///
/// An attachment owns its related sub-attachments, e.g. the images an HTML
/// part references. Trees are built bottom-up, so they cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Pre-rendered header lines, each terminated by CRLF.
    pub header: String,
    /// What to encode as the part body.
    pub payload: Payload,
    /// Parts wrapped together with this one in a `multipart/related` envelope.
    pub related: Vec<Attachment>,
}

impl Attachment {
    /// Creates an attachment from a header block and payload.
    pub fn new(header: impl Into<String>, payload: Payload) -> Self {
        Self {
            header: header.into(),
            payload,
            related: Vec::new(),
        }
    }

    /// Creates an attachment carrying in-memory bytes.
    pub fn bytes(header: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(header, Payload::Bytes(data.into()))
    }

    /// Creates an attachment carrying PGP armored text.
    pub fn pgp(header: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(header, Payload::Pgp(text.into()))
    }

    /// Creates an attachment read from a file at send time.
    pub fn file(header: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(header, Payload::File(path.into()))
    }

    /// Creates an attachment carrying inline HTML.
    pub fn html(header: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(header, Payload::Html(html.into()))
    }

    /// Appends a related attachment.
    pub fn with_related(mut self, related: Attachment) -> Self {
        self.related.push(related);
        self
    }

    /// Reports whether this attachment needs a `multipart/related` envelope.
    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }
}

/// A fully built outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Pre-rendered top-level header lines, each terminated by CRLF.
    pub headers: String,
    /// The plain-text body.
    pub text: String,
    /// An alternative rendering of the text, usually HTML.
    pub alternative: Option<Attachment>,
    /// Attachments in output order.
    pub attachments: Vec<Attachment>,
    /// Whether the body is a PGP/MIME encrypted message.
    pub is_pgp: bool,
}

impl Message {
    /// Creates a plain message with no attachments.
    pub fn new(headers: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            headers: headers.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the alternative rendering.
    pub fn with_alternative(mut self, alternative: Attachment) -> Self {
        self.alternative = Some(alternative);
        self
    }

    /// Appends an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Marks the message as PGP/MIME encrypted.
    pub fn pgp(mut self) -> Self {
        self.is_pgp = true;
        self
    }

    /// Reports whether the body goes into a multipart envelope.
    ///
    /// True once anything is attached, including an alternative rendering.
    pub fn has_attachment(&self) -> bool {
        !self.attachments.is_empty() || self.alternative.is_some()
    }
}
