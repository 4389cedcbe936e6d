//! Validation of raw provider output.
//!
//! Checks run in order: fence stripping, JSON parse, required fields, and
//! only when every field is present, syntax balance plus design
//! compliance. Required-field and later errors accumulate rather than
//! short-circuit. The validator holds no mutable state, so identical input
//! always yields an identical outcome.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::design_system::PRIMARY_COLOR;
use crate::domain::{ComponentArtifact, DesignSystem, ValidationOutcome};

pub const INVALID_JSON: &str = "Invalid JSON format or non-JSON output generated.";

#[derive(Debug, Clone)]
pub struct Validator {
    /// Lower-cased primary colour; `None` skips the compliance check
    primary_color: Option<String>,
}

impl Validator {
    pub fn new(design: &DesignSystem) -> Self {
        Self {
            primary_color: design.token(PRIMARY_COLOR).map(str::to_lowercase),
        }
    }

    /// Classify one raw response
    pub fn validate(&self, raw: &str) -> ValidationOutcome {
        let cleaned = strip_code_fence(raw);

        let fields = match serde_json::from_str::<Value>(cleaned) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) | Err(_) => {
                debug!("Response is not a JSON object");
                return ValidationOutcome::Invalid {
                    errors: vec![INVALID_JSON.to_string()],
                    partial: None,
                };
            }
        };

        let html = string_field(&fields, "html");
        let css = string_field(&fields, "css");
        let typescript = string_field(&fields, "typescript");

        let mut errors = Vec::new();
        for (name, value) in [("html", html), ("typescript", typescript)] {
            if value.map_or(true, str::is_empty) {
                errors.push(format!("Missing or empty component part: {}", name));
            }
        }
        if css.is_none() {
            errors.push("Missing component part: css".to_string());
        }

        let artifact = ComponentArtifact::new(
            html.unwrap_or_default(),
            css.unwrap_or_default(),
            typescript.unwrap_or_default(),
        );

        if errors.is_empty() {
            errors.extend(check_syntax(&artifact));
            errors.extend(self.check_design_compliance(&artifact));
        }

        if errors.is_empty() {
            ValidationOutcome::Valid(artifact)
        } else {
            debug!(error_count = errors.len(), "Validation failed");
            ValidationOutcome::Invalid {
                errors,
                partial: Some(artifact),
            }
        }
    }

    /// The primary colour must appear somewhere in html + css
    fn check_design_compliance(&self, artifact: &ComponentArtifact) -> Vec<String> {
        let Some(ref primary) = self.primary_color else {
            return Vec::new();
        };

        let markup = format!("{}{}", artifact.html, artifact.css).to_lowercase();
        if markup.contains(primary.as_str()) {
            Vec::new()
        } else {
            vec![format!(
                "Design Token Violation: Primary color '{}' was not used.",
                primary
            )]
        }
    }
}

/// Brace and parenthesis balance for typescript and css
fn check_syntax(artifact: &ComponentArtifact) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, content) in [("typescript", &artifact.typescript), ("css", &artifact.css)] {
        if content.matches('{').count() != content.matches('}').count() {
            errors.push(format!("Unbalanced curly braces in {}", name));
        }
        if content.matches('(').count() != content.matches(')').count() {
            errors.push(format!("Unbalanced parentheses in {}", name));
        }
    }

    errors
}

/// A field's value when it is a JSON string
fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
