//! Multipart MIME envelope writing.

pub mod boundary;
pub mod envelope;

pub use boundary::{Boundary, BoundaryGenerator, SequentialBoundaries, UuidBoundaries};
pub use envelope::{Envelope, MultipartKind};
