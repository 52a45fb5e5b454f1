//! Debounce timeout value object

use std::fmt;
use std::time::Duration;

use crate::error::{MicrosyncError, MicrosyncResult};

/// Default quiescence window in seconds
pub const DEFAULT_DEBOUNCE_SECS: f64 = 0.5;

/// Quiescence window required after the last notification before a flush
///
/// Always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimeout(Duration);

impl DebounceTimeout {
    /// Validate a timeout given in (fractional) seconds
    pub fn from_secs_f64(secs: f64) -> MicrosyncResult<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(MicrosyncError::InvalidTimeout {
                value: secs.to_string(),
            });
        }
        let duration =
            Duration::try_from_secs_f64(secs).map_err(|_| MicrosyncError::InvalidTimeout {
                value: secs.to_string(),
            })?;
        if duration.is_zero() {
            return Err(MicrosyncError::InvalidTimeout {
                value: secs.to_string(),
            });
        }
        Ok(Self(duration))
    }

    /// Parse a timeout from text, e.g. a CLI flag or env var
    pub fn parse(value: &str) -> MicrosyncResult<Self> {
        let secs: f64 = value
            .trim()
            .parse()
            .map_err(|_| MicrosyncError::InvalidTimeout {
                value: value.to_string(),
            })?;
        Self::from_secs_f64(secs)
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for DebounceTimeout {
    fn default() -> Self {
        Self(Duration::from_millis(500))
    }
}

impl fmt::Display for DebounceTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs_f64())
    }
}
