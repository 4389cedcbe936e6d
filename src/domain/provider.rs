//! Identifiers for the supported text-generation providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A text-generation provider.
///
/// Declaration order is the fixed fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
    Gemini,
}

impl ProviderId {
    /// All providers in fallback order
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Groq,
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::Gemini,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Human-readable label for logs and listings
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq (Llama 3.3-70b)",
            Self::OpenAi => "OpenAI (GPT-4o)",
            Self::Claude => "Anthropic (Claude 3.5)",
            Self::Gemini => "Google (Gemini 2.0 Flash)",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// `preferred` first, then every other provider in fallback order
    pub fn fallback_order(preferred: ProviderId) -> Vec<ProviderId> {
        std::iter::once(preferred)
            .chain(Self::ALL.into_iter().filter(|p| *p != preferred))
            .collect()
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::Groq
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!(
                "Unknown provider '{}'. Supported: groq, openai, claude, gemini",
                other
            )),
        }
    }
}
