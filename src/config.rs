//! Writer configuration.
//!
//! Configuration can be built in code, or loaded from a TOML document such as:
//!
//! ```toml
//! line_length = 76
//! cache_capacity = 256
//! stream_line_terminator = "\r\n"
//! ```
//!
//! Missing keys fall back to the defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Default base64 line length (RFC 2045).
pub const DEFAULT_LINE_LENGTH: usize = 76;

/// Hard upper bound for a line, excluding CRLF (RFC 5322).
const MAX_LINE_LENGTH: usize = 998;

/// Top-level writer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of characters per base64 output line.
    pub line_length: usize,
    /// Maximum number of cached encodings; `None` keeps every entry.
    pub cache_capacity: Option<usize>,
    /// Terminator the generic stream sink appends after each text write.
    pub stream_line_terminator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_length: DEFAULT_LINE_LENGTH,
            cache_capacity: None,
            stream_line_terminator: "\r\n".to_string(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded writer config");
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.line_length == 0 || self.line_length % 4 != 0 {
            return Err(Error::Config(format!(
                "line_length must be a positive multiple of 4, got {}",
                self.line_length
            )));
        }
        if self.line_length > MAX_LINE_LENGTH {
            return Err(Error::Config(format!(
                "line_length must not exceed {}, got {}",
                MAX_LINE_LENGTH, self.line_length
            )));
        }
        if self.cache_capacity == Some(0) {
            return Err(Error::Config("cache_capacity must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Returns the cache bound, if any.
    pub(crate) fn cache_bound(&self) -> Option<NonZeroUsize> {
        self.cache_capacity.and_then(NonZeroUsize::new)
    }
}
