//! Multipart boundary tokens.

use crate::error::{Error, Result};
use crate::grammar;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A boundary delimiting the parts of one multipart envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Creates a boundary from a custom token.
    ///
    /// The token must be 1-70 characters and contain only valid characters.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if !grammar::is_boundary(&token) {
            return Err(Error::Multipart(format!("invalid boundary: {:?}", token)));
        }
        Ok(Self(token))
    }

    /// Generates a random boundary.
    ///
    /// Boundaries are the 32 hex digits of a v4 UUID without separators.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the boundary token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `boundary=` parameter value, quoted when not a plain token.
    pub fn param_value(&self) -> String {
        if grammar::is_token(&self.0) {
            self.0.clone()
        } else {
            format!("\"{}\"", self.0)
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh boundaries, one per envelope.
pub trait BoundaryGenerator: Send + Sync {
    /// Returns a boundary not used by any other envelope of the message.
    fn next_boundary(&self) -> Boundary;
}

/// Random UUID boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidBoundaries;

impl BoundaryGenerator for UuidBoundaries {
    fn next_boundary(&self) -> Boundary {
        Boundary::random()
    }
}

/// Deterministic boundaries: the prefix followed by a running counter.
///
/// Useful for reproducible output in diagnostics and tests.
#[derive(Debug)]
pub struct SequentialBoundaries {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialBoundaries {
    /// Creates a generator. The prefix plus counter must form a valid boundary.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        // Widest counter suffix is 20 digits.
        Boundary::new(format!("{}{}", prefix, u64::MAX))?;
        Ok(Self {
            prefix,
            counter: AtomicU64::new(0),
        })
    }
}

impl BoundaryGenerator for SequentialBoundaries {
    fn next_boundary(&self) -> Boundary {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Boundary(format!("{}{}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_boundary_shape() {
        let b = Boundary::random();
        assert_eq!(b.as_str().len(), 32);
        assert!(b.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(Boundary::random(), b);
    }

    #[test]
    fn test_boundary_validation() {
        assert!(Boundary::new("simple-boundary").is_ok());
        assert!(Boundary::new("a".repeat(71)).is_err());
        assert!(Boundary::new(String::new()).is_err());
        assert!(Boundary::new("bad;boundary").is_err());
    }

    #[test]
    fn test_param_value_quoting() {
        assert_eq!(Boundary::new("abc123").unwrap().param_value(), "abc123");
        assert_eq!(
            Boundary::new("==_part_==").unwrap().param_value(),
            "\"==_part_==\""
        );
        assert_eq!(
            Boundary::new("has space").unwrap().param_value(),
            "\"has space\""
        );
    }

    #[test]
    fn test_sequential_boundaries() {
        let gen = SequentialBoundaries::new("b").unwrap();
        assert_eq!(gen.next_boundary().as_str(), "b0");
        assert_eq!(gen.next_boundary().as_str(), "b1");
        assert!(SequentialBoundaries::new("bad;").is_err());
        assert!(SequentialBoundaries::new("x".repeat(60)).is_err());
    }
}
