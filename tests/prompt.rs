//! Prompt construction through the public API.

use component_architect::core::prompt::{extract_request, HISTORY_WINDOW};
use component_architect::core::PromptBuilder;
use component_architect::DesignSystem;

fn design() -> DesignSystem {
    DesignSystem::from_tokens([("primary-color", "#0EA5E9"), ("font-family", "Roboto")])
}

#[test]
fn test_initial_prompt_embeds_tokens_and_request() {
    let prompt = PromptBuilder::new().build_initial_prompt("  a glass login card ", &design().tokens, &[]);

    assert!(prompt.contains("\"primary-color\": \"#0EA5E9\""));
    assert!(prompt.contains("\"font-family\": \"Roboto\""));
    assert!(prompt.ends_with("USER REQUEST: a glass login card"));
    assert!(!prompt.contains("Context from previous turns"));
    assert_eq!(extract_request(&prompt), "a glass login card");
}

#[test]
fn test_history_is_windowed_to_recent_turns() {
    let history: Vec<String> = (1..=5).map(|i| format!("turn {}", i)).collect();
    let prompt = PromptBuilder::new().build_initial_prompt("next", &design().tokens, &history);

    let replayed = prompt.matches("Previous: ").count();
    assert_eq!(replayed, HISTORY_WINDOW);
    assert!(!prompt.contains("Previous: turn 2"));
    assert!(prompt.contains("Previous: turn 3"));
    assert!(prompt.contains("Previous: turn 5"));
}

#[test]
fn test_corrective_prompt_lists_every_error() {
    let errors = vec![
        "Unbalanced curly braces in typescript".to_string(),
        "Missing component part: css".to_string(),
    ];
    let prompt = PromptBuilder::new().build_corrective_prompt(&errors, &design().tokens);

    assert!(prompt.contains("- Unbalanced curly braces in typescript\n- Missing component part: css"));
    assert!(prompt.contains("You MUST use the primary color #0EA5E9"));
    assert!(prompt.contains("\"html\", \"css\", \"typescript\""));
}

#[test]
fn test_corrective_prompt_defaults_primary_color() {
    let empty = DesignSystem::from_tokens(std::iter::empty::<(&str, &str)>());
    let prompt = PromptBuilder::new().build_corrective_prompt(&[], &empty.tokens);

    assert!(prompt.contains("You MUST use the primary color #6366f1"));
}

#[test]
fn test_extract_request_without_marker_returns_whole_prompt() {
    assert_eq!(extract_request("The previous component had errors"), "The previous component had errors");
}
