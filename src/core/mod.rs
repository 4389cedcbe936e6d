//! Core generation logic.
//!
//! This module contains:
//! - Prompt: Initial and corrective prompt construction
//! - Generation: Ordered provider fallback
//! - Validator: Structural and design-token checks
//! - Limits: Retry ceiling and per-call timeout
//! - Orchestrator: The attempt loop

pub mod generation;
pub mod limits;
pub mod orchestrator;
pub mod prompt;
pub mod validator;

// Re-export commonly used types
pub use generation::{Generated, GenerationClient, GenerationSource};
pub use limits::{GenerationLimits, LimitViolation, MAX_RETRIES, MIN_RETRIES};
pub use orchestrator::{orchestrate, AttemptRun, GenerationOutcome, Orchestrator};
pub use prompt::PromptBuilder;
pub use validator::Validator;
