//! Design-system document: named tokens plus opaque rules.
//!
//! Loaded once per run and shared read-only. A missing or malformed file
//! degrades to an empty document instead of failing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const PRIMARY_COLOR: &str = "primary-color";
pub const GLASS_BACKGROUND: &str = "glass-background";
pub const BORDER_RADIUS: &str = "border-radius";
pub const FONT_FAMILY: &str = "font-family";

pub const DEFAULT_PRIMARY_COLOR: &str = "#6366f1";
pub const DEFAULT_GLASS_BACKGROUND: &str = "rgba(255,255,255,0.1)";
pub const DEFAULT_BORDER_RADIUS: &str = "8px";
pub const DEFAULT_FONT_FAMILY: &str = "Inter, sans-serif";

/// Token name to value, kept sorted so prompts render deterministically.
///
/// Values are arbitrary JSON; only string values are read as tokens.
pub type Tokens = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignSystem {
    #[serde(default)]
    pub tokens: Tokens,

    /// Not interpreted by validation
    #[serde(default)]
    pub rules: serde_json::Map<String, Value>,
}

impl DesignSystem {
    /// Build a design system from tokens alone
    pub fn from_tokens<I, K, V>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
            rules: serde_json::Map::new(),
        }
    }

    /// Load from a JSON file, falling back to an empty document
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Design system file not found, using empty document");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Failed to parse design system");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read design system");
                Self::default()
            }
        }
    }

    /// Parse a design-system document
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Look up a string token, ignoring empty values
    pub fn token(&self, name: &str) -> Option<&str> {
        token_str(&self.tokens, name)
    }

    /// Look up a token with a fallback
    pub fn token_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.token(name).unwrap_or(default)
    }

    pub fn primary_color(&self) -> &str {
        self.token_or(PRIMARY_COLOR, DEFAULT_PRIMARY_COLOR)
    }

    pub fn glass_background(&self) -> &str {
        self.token_or(GLASS_BACKGROUND, DEFAULT_GLASS_BACKGROUND)
    }

    pub fn border_radius(&self) -> &str {
        self.token_or(BORDER_RADIUS, DEFAULT_BORDER_RADIUS)
    }

    pub fn font_family(&self) -> &str {
        self.token_or(FONT_FAMILY, DEFAULT_FONT_FAMILY)
    }
}

/// A non-empty string token from `tokens`
pub fn token_str<'a>(tokens: &'a Tokens, name: &str) -> Option<&'a str> {
    tokens
        .get(name)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_tokens_missing() {
        let ds = DesignSystem::default();
        assert_eq!(ds.primary_color(), "#6366f1");
        assert_eq!(ds.glass_background(), "rgba(255,255,255,0.1)");
        assert_eq!(ds.border_radius(), "8px");
        assert_eq!(ds.font_family(), "Inter, sans-serif");
        assert!(ds.token(PRIMARY_COLOR).is_none());
    }

    #[test]
    fn test_configured_tokens_win() {
        let ds = DesignSystem::from_tokens([("primary-color", "#111"), ("border-radius", "")]);
        assert_eq!(ds.primary_color(), "#111");
        // Empty values fall back like missing ones
        assert_eq!(ds.border_radius(), "8px");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let ds = DesignSystem::load(&temp.path().join("nope.json"));
        assert_eq!(ds, DesignSystem::default());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("design-system.json");
        std::fs::write(&path, "{ tokens: oops").unwrap();

        let ds = DesignSystem::load(&path);
        assert!(ds.tokens.is_empty());
        assert!(ds.rules.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("design-system.json");
        std::fs::write(
            &path,
            r##"{"tokens":{"primary-color":"#0ea5e9","font-family":"Roboto"},"rules":{"spacing":"4px grid"}}"##,
        )
        .unwrap();

        let ds = DesignSystem::load(&path);
        assert_eq!(ds.primary_color(), "#0ea5e9");
        assert_eq!(ds.font_family(), "Roboto");
        assert_eq!(ds.rules["spacing"], "4px grid");
    }

    #[test]
    fn test_load_keeps_string_tokens_beside_other_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("design-system.json");
        std::fs::write(
            &path,
            r##"{"tokens":{"primary-color":"#0ea5e9","spacing-unit":4,"spacing":{"sm":"4px"}}}"##,
        )
        .unwrap();

        let ds = DesignSystem::load(&path);
        assert_eq!(ds.token(PRIMARY_COLOR), Some("#0ea5e9"));
        assert_eq!(ds.tokens["spacing-unit"], 4);
        // Non-string values are kept but never read as a token
        assert!(ds.token("spacing").is_none());
        assert_eq!(ds.border_radius(), "8px");
    }
}
