//! component-architect - Design-system governed UI component generator
//!
//! Turns a natural-language request into an Angular component (template,
//! styles, class) by calling a text-generation provider, validating the
//! reply against the design tokens and re-prompting with the validation
//! errors until it passes or the retry budget runs out.
//!
//! # Architecture
//!
//! The attempt loop is a bounded state machine:
//! - The prompt builder renders the request and tokens into an instruction
//! - The generation client walks the providers in fallback order, with a
//!   deterministic offline generator as the last resort
//! - The validator classifies each reply as a valid artifact or an error list
//! - The orchestrator emits progress events one at a time
//!
//! # Modules
//!
//! - `adapters`: Provider integrations (Groq, OpenAI, Claude, Gemini, offline)
//! - `core`: Prompt building, generation, validation, orchestration
//! - `domain`: Data structures (DesignSystem, ComponentArtifact, AttemptEvent)
//! - `config`: Configuration discovery
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Generate a component
//! component-architect generate "a glassmorphism login card"
//!
//! # Stream events as JSON lines, preferring Gemini
//! component-architect generate "a stats dashboard" --provider gemini --json
//!
//! # Check raw provider output
//! component-architect validate --input reply.json
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{Provider, ProviderError, ProviderRegistry};
pub use core::{orchestrate, AttemptRun, GenerationLimits, GenerationOutcome, Orchestrator};
pub use domain::{AttemptEvent, ComponentArtifact, DesignSystem, ProviderId, ValidationOutcome};
