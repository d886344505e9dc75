//! Single-pass MIME content writer for outgoing mail, with async-first design.
//!
//! This crate turns a structured outgoing [`Message`] into a MIME byte stream
//! and writes it part by part to an open destination:
//! - `multipart/mixed`, `/alternative`, `/related` and `/encrypted` envelope
//!   nesting with fresh boundaries (RFC 2046, RFC 3156)
//! - Base64 transfer encoding wrapped at 76 characters (RFC 2045)
//! - An encoded-payload cache shared across sends
//! - Interchangeable sinks for a live transport or a diagnostic stream
//!
//! The SMTP session that reaches the DATA phase and terminates it afterwards
//! is left to the caller. All I/O operations are async-first using tokio.

pub mod config;
pub mod encoding;
pub mod error;
pub mod grammar;
pub mod message;
pub mod multipart;
pub mod sink;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use encoding::{ContentEncoder, EncodingCache};
pub use error::{Error, Result};
pub use message::{Attachment, Message, Payload};
pub use sink::{Sink, StreamSink, TransportSink};
pub use writer::{render, MessageWriter};
