//! Provider-agnostic prompt construction.
//!
//! Pure string building: the initial instruction for a user request, and
//! the corrective follow-up listing the previous attempt's errors.

use crate::domain::design_system::{token_str, Tokens, DEFAULT_PRIMARY_COLOR, PRIMARY_COLOR};

/// Marks the start of the user's request inside an initial prompt
pub const REQUEST_MARKER: &str = "USER REQUEST:";

/// How many previous turns are replayed as context
pub const HISTORY_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Instruction for the first attempt of a request
    pub fn build_initial_prompt(&self, user_request: &str, tokens: &Tokens, history: &[String]) -> String {
        let context = render_history(history);

        format!(
            r#"You are an expert Angular & Tailwind CSS developer.
TASK: Generate a valid Angular component based on the user's request.

DESIGN SYSTEM (You MUST use these exact values):
{tokens}

CONSTRAINTS:
1. Use Tailwind CSS for all layout and custom styling.
2. Use Angular Material components (MatCard, MatButton, MatInput, etc.) where helpful.
3. Use ONLY the hex codes, fonts, and spacing from the Design System above.
4. Output MUST be a valid JSON object with exactly these keys:
   - "html": The Angular HTML template string. IMPORTANT: Ensure the template uses static placeholder text (e.g., "12:00 PM") instead of empty Angular interpolation (e.g., "{{{{ currentTime }}}}") so it looks good in a static preview.
   - "css": Any extra custom CSS string (can be empty string "").
   - "typescript": The Angular TypeScript component class string.
5. Do NOT output any markdown, code fences, or explanation. Raw JSON ONLY.
{context}
{marker} {request}"#,
            tokens = render_tokens(tokens),
            context = context,
            marker = REQUEST_MARKER,
            request = user_request.trim(),
        )
    }

    /// Follow-up instruction after a failed validation
    pub fn build_corrective_prompt(&self, errors: &[String], tokens: &Tokens) -> String {
        let primary = token_str(tokens, PRIMARY_COLOR).unwrap_or(DEFAULT_PRIMARY_COLOR);

        let bullets = errors
            .iter()
            .map(|e| format!("- {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"The previous Angular component had errors. Fix them.

ERRORS:
{bullets}

You MUST use the primary color {primary} and follow the design system.
Output ONLY valid JSON with keys: "html", "css", "typescript". No markdown.
"#,
            bullets = bullets,
            primary = primary,
        )
    }
}

/// Tokens as indented JSON
fn render_tokens(tokens: &Tokens) -> String {
    serde_json::to_string_pretty(tokens).unwrap_or_else(|_| "{}".to_string())
}

/// The most recent turns as `Previous:` lines, or an empty string
fn render_history(history: &[String]) -> String {
    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    if recent.is_empty() {
        return String::new();
    }

    let lines = recent
        .iter()
        .map(|h| format!("Previous: {}", h))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\nContext from previous turns:\n{}\n", lines)
}

/// The request text following the last [`REQUEST_MARKER`], or all of `prompt`
pub fn extract_request(prompt: &str) -> &str {
    match prompt.rfind(REQUEST_MARKER) {
        Some(idx) => prompt[idx + REQUEST_MARKER.len()..].trim(),
        None => prompt,
    }
}
