//! Progress events emitted by an orchestration run.
//!
//! Events are the only channel between the attempt loop and its caller.
//! They are emitted in strict temporal order and serialize to the wire
//! shape `{ step, value, errors?, data? }`.

use serde::{Deserialize, Serialize};

use super::artifact::ComponentArtifact;

/// One step of progress in the attempt loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum AttemptEvent {
    /// A new attempt has started (1-based)
    Attempt { value: u32 },

    /// The provider is being asked for code
    Generating { value: String },

    /// The raw response is being validated
    Validating { value: String },

    /// Validation failed with the listed errors
    Failed { value: String, errors: Vec<String> },

    /// A corrective prompt is being prepared for the next attempt
    Correcting { value: String },

    /// Validation passed. Terminal.
    Success {
        value: String,
        data: ComponentArtifact,
    },

    /// The retry budget ran out. Terminal, surfaced as a warning.
    #[serde(rename = "max_retries")]
    MaxRetriesReached {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<ComponentArtifact>,
    },
}

impl AttemptEvent {
    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::MaxRetriesReached { .. })
    }

    /// Wire name of the event's step
    pub fn step(&self) -> &'static str {
        match self {
            Self::Attempt { .. } => "attempt",
            Self::Generating { .. } => "generating",
            Self::Validating { .. } => "validating",
            Self::Failed { .. } => "failed",
            Self::Correcting { .. } => "correcting",
            Self::Success { .. } => "success",
            Self::MaxRetriesReached { .. } => "max_retries",
        }
    }
}
