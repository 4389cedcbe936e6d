//! Bounds on an orchestration run.
//!
//! The attempt loop is bounded only by its retry ceiling; each provider
//! call is bounded by a per-call timeout.
//!
//! Retry ceiling policy: requested values are clamped into
//! `MIN_RETRIES..=MAX_RETRIES`, so 0 and negatives run exactly one
//! attempt. Config files are checked strictly with [`GenerationLimits::validate`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_RETRIES: u32 = 1;
pub const MAX_RETRIES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLimits {
    /// Attempts per request (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per provider call timeout in seconds (default: 30)
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_seconds: u64,
}

fn default_max_retries() -> u32 {
    3
}
fn default_provider_timeout() -> u64 {
    30
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            provider_timeout_seconds: default_provider_timeout(),
        }
    }
}

impl GenerationLimits {
    /// Clamp a caller-supplied retry ceiling into the supported range
    pub fn clamp_retries(requested: i64) -> u32 {
        requested.clamp(MIN_RETRIES as i64, MAX_RETRIES as i64) as u32
    }

    /// Copy of these limits with a clamped retry ceiling
    pub fn with_max_retries(self, requested: i64) -> Self {
        Self {
            max_retries: Self::clamp_retries(requested),
            ..self
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// Copy with every field brought into range: the retry ceiling is
    /// clamped and a zero timeout becomes the default
    pub fn sanitized(self) -> Self {
        Self {
            max_retries: Self::clamp_retries(self.max_retries as i64),
            provider_timeout_seconds: match self.provider_timeout_seconds {
                0 => default_provider_timeout(),
                secs => secs,
            },
        }
    }

    /// Reject values outside the supported ranges
    pub fn validate(&self) -> Result<(), LimitViolation> {
        if !(MIN_RETRIES..=MAX_RETRIES).contains(&self.max_retries) {
            return Err(LimitViolation::MaxRetriesOutOfRange {
                value: self.max_retries as i64,
                min: MIN_RETRIES,
                max: MAX_RETRIES,
            });
        }
        if self.provider_timeout_seconds == 0 {
            return Err(LimitViolation::ZeroTimeout);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitViolation {
    #[error("max_retries must be between {min} and {max}, got {value}")]
    MaxRetriesOutOfRange { value: i64, min: u32, max: u32 },

    #[error("provider_timeout_seconds must be greater than zero")]
    ZeroTimeout,
}
