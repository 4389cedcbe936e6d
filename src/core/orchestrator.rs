//! Attempt loop for component generation.
//!
//! Sequences prompt building, generation and validation, deciding after
//! each validation whether to retry with corrective feedback or stop.
//! A run is a pull-based producer: each [`AttemptRun::next_event`] call
//! advances the state machine by exactly one event.
//!
//! ```text
//! Attempting(n) -> Generating(n) -> Calling(n) -> Validating(n)
//!     Validating(n) -> Success                              (valid)
//!     Validating(n) -> Correcting -> Attempting(n + 1)      (invalid, n < max)
//!     Validating(n) -> Exhausted -> MaxRetriesReached       (invalid, n == max)
//! ```
//!
//! Retries are immediate; there is no backoff between attempts.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::adapters::ProviderRegistry;
use crate::domain::{
    AttemptEvent, ComponentArtifact, DesignSystem, ProviderId, ValidationOutcome,
};

use super::generation::GenerationClient;
use super::limits::GenerationLimits;
use super::prompt::PromptBuilder;
use super::validator::Validator;

const VALIDATING_MESSAGE: &str = "Validating design compliance & syntax...";
const CORRECTING_MESSAGE: &str = "Re-prompting LLM with error feedback...";
const SUCCESS_MESSAGE: &str = "Validation passed!";
const MAX_RETRIES_MESSAGE: &str = "Max retries reached.";

/// Final result of a driven run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Validation passed
    Success(ComponentArtifact),

    /// Retries exhausted; carries the last partial artifact, if any.
    /// A warning, not a hard failure.
    Exhausted(Option<ComponentArtifact>),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Best available artifact
    pub fn artifact(&self) -> Option<&ComponentArtifact> {
        match self {
            Self::Success(artifact) => Some(artifact),
            Self::Exhausted(partial) => partial.as_ref(),
        }
    }
}

/// Session-level orchestrator.
///
/// Holds the read-only design system and provider registry; each call to
/// [`Orchestrator::orchestrate`] starts an independent run.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    design: Arc<DesignSystem>,
    registry: Arc<ProviderRegistry>,
    limits: GenerationLimits,
    prompts: PromptBuilder,
}

impl Orchestrator {
    /// Out-of-range `limits` are logged and brought into range
    pub fn new(design: Arc<DesignSystem>, registry: Arc<ProviderRegistry>, limits: GenerationLimits) -> Self {
        let limits = match limits.validate() {
            Ok(()) => limits,
            Err(e) => {
                let sanitized = limits.sanitized();
                warn!(error = %e, ?sanitized, "Invalid generation limits, adjusting");
                sanitized
            }
        };

        Self {
            design,
            registry,
            limits,
            prompts: PromptBuilder::new(),
        }
    }

    pub fn design(&self) -> &DesignSystem {
        &self.design
    }

    pub fn limits(&self) -> GenerationLimits {
        self.limits
    }

    /// Start a run for `request`.
    ///
    /// `max_retries` is clamped into `1..=5`. Nothing happens until the
    /// first event is pulled.
    pub fn orchestrate(
        &self,
        request: &str,
        max_retries: i64,
        preferred: ProviderId,
        history: &[String],
    ) -> AttemptRun {
        let max_retries = GenerationLimits::clamp_retries(max_retries);
        let run_id = Uuid::new_v4();
        let span = info_span!("orchestrate", %run_id, %preferred, max_retries);

        let prompt = self
            .prompts
            .build_initial_prompt(request, &self.design.tokens, history);

        AttemptRun {
            run_id,
            span,
            generation: GenerationClient::new(
                self.registry.clone(),
                self.design.clone(),
                self.limits.provider_timeout(),
            ),
            validator: Validator::new(&self.design),
            prompts: self.prompts,
            design: self.design.clone(),
            request: request.trim().to_string(),
            preferred,
            max_retries,
            prompt,
            phase: Phase::Attempting(1),
        }
    }
}

/// Run the attempt loop with a registry built from `credentials`.
///
/// Explicit credentials win over the environment; providers with neither
/// are skipped.
pub fn orchestrate(
    design: Arc<DesignSystem>,
    request: &str,
    max_retries: i64,
    preferred: ProviderId,
    history: &[String],
    credentials: &HashMap<ProviderId, String>,
    limits: GenerationLimits,
) -> AttemptRun {
    let registry =
        ProviderRegistry::from_credentials(credentials, &HashMap::new(), limits.provider_timeout());
    Orchestrator::new(design, Arc::new(registry), limits).orchestrate(
        request,
        max_retries,
        preferred,
        history,
    )
}

enum Phase {
    Attempting(u32),
    Generating(u32),
    Calling(u32),
    Validating { attempt: u32, raw: String },
    Correcting { next: u32 },
    Exhausted { partial: Option<ComponentArtifact> },
    Finished,
}

/// One orchestration run. Not resumable; start a new run to retry.
pub struct AttemptRun {
    run_id: Uuid,
    span: Span,
    generation: GenerationClient,
    validator: Validator,
    prompts: PromptBuilder,
    design: Arc<DesignSystem>,
    request: String,
    preferred: ProviderId,
    max_retries: u32,
    prompt: String,
    phase: Phase,
}

impl AttemptRun {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Effective retry ceiling after clamping
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether the terminal event has already been emitted
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Advance by one event; `None` once the run has terminated.
    ///
    /// Dropping the returned future mid-call ends the run: the phase is
    /// taken before any provider call starts.
    pub async fn next_event(&mut self) -> Option<AttemptEvent> {
        let span = self.span.clone();
        self.step().instrument(span).await
    }

    async fn step(&mut self) -> Option<AttemptEvent> {
        let phase = std::mem::replace(&mut self.phase, Phase::Finished);

        let (event, next) = match phase {
            Phase::Attempting(attempt) => {
                info!(attempt, max_retries = self.max_retries, "Starting attempt");
                (AttemptEvent::Attempt { value: attempt }, Phase::Generating(attempt))
            }
            Phase::Generating(attempt) => (
                AttemptEvent::Generating {
                    value: format!(
                        "Generating code (Attempt {}/{})...",
                        attempt, self.max_retries
                    ),
                },
                Phase::Calling(attempt),
            ),
            Phase::Calling(attempt) => {
                let raw = self
                    .generation
                    .generate_for(&self.prompt, &self.request, self.preferred)
                    .await
                    .text;
                (
                    AttemptEvent::Validating {
                        value: VALIDATING_MESSAGE.to_string(),
                    },
                    Phase::Validating { attempt, raw },
                )
            }
            Phase::Validating { attempt, raw } => self.judge(attempt, &raw),
            Phase::Correcting { next } => (
                AttemptEvent::Correcting {
                    value: CORRECTING_MESSAGE.to_string(),
                },
                Phase::Attempting(next),
            ),
            Phase::Exhausted { partial } => {
                warn!(max_retries = self.max_retries, has_partial = partial.is_some(), "Retries exhausted");
                (
                    AttemptEvent::MaxRetriesReached {
                        value: MAX_RETRIES_MESSAGE.to_string(),
                        data: partial,
                    },
                    Phase::Finished,
                )
            }
            Phase::Finished => return None,
        };

        self.phase = next;
        Some(event)
    }

    /// Validate one response and pick the next phase
    fn judge(&mut self, attempt: u32, raw: &str) -> (AttemptEvent, Phase) {
        match self.validator.validate(raw) {
            ValidationOutcome::Valid(artifact) => {
                info!(attempt, "Validation passed");
                (
                    AttemptEvent::Success {
                        value: SUCCESS_MESSAGE.to_string(),
                        data: artifact,
                    },
                    Phase::Finished,
                )
            }
            ValidationOutcome::Invalid { errors, partial } => {
                warn!(attempt, error_count = errors.len(), "Validation failed");

                let next = if attempt < self.max_retries {
                    self.prompt = self
                        .prompts
                        .build_corrective_prompt(&errors, &self.design.tokens);
                    Phase::Correcting { next: attempt + 1 }
                } else {
                    Phase::Exhausted { partial }
                };

                (
                    AttemptEvent::Failed {
                        value: format!("Found {} issue(s)", errors.len()),
                        errors,
                    },
                    next,
                )
            }
        }
    }

    /// Pull every event, handing each to `on_event`, and return the outcome
    pub async fn drive<F>(mut self, mut on_event: F) -> GenerationOutcome
    where
        F: FnMut(&AttemptEvent),
    {
        let mut outcome = GenerationOutcome::Exhausted(None);

        while let Some(event) = self.next_event().await {
            on_event(&event);
            match event {
                AttemptEvent::Success { data, .. } => outcome = GenerationOutcome::Success(data),
                AttemptEvent::MaxRetriesReached { data, .. } => {
                    outcome = GenerationOutcome::Exhausted(data)
                }
                _ => {}
            }
        }

        outcome
    }

    /// Pull every event into a vector
    pub async fn collect(mut self) -> Vec<AttemptEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }
}
