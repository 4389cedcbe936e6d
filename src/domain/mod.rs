//! Domain types for the component generator.
//!
//! This module contains the core data structures:
//! - DesignSystem: Tokens the generated code must honour
//! - ComponentArtifact: The three-part generated output
//! - ValidationOutcome: Valid artifact or error list
//! - AttemptEvent: Progress events of the attempt loop
//! - ProviderId: Supported text-generation providers

pub mod artifact;
pub mod design_system;
pub mod events;
pub mod outcome;
pub mod provider;

// Re-export commonly used types
pub use artifact::ComponentArtifact;
pub use design_system::{DesignSystem, Tokens};
pub use events::AttemptEvent;
pub use outcome::ValidationOutcome;
pub use provider::ProviderId;
