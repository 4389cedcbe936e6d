//! Configuration for the component generator.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables (ARCHITECT_DESIGN_SYSTEM, ARCHITECT_PROVIDER,
//!    ARCHITECT_MAX_RETRIES)
//! 3. Config file (.architect/config.yaml, or the user config directory)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches the current directory and parents for .architect/config.yaml
//! - Falls back to <config dir>/component-architect/config.yaml
//! - Relative paths resolve against the project root (parent of .architect/)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::ProviderOverrides;
use crate::core::GenerationLimits;
use crate::domain::ProviderId;

pub const CONFIG_DIR: &str = ".architect";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_DESIGN_SYSTEM: &str = "design-system.json";

pub const ENV_DESIGN_SYSTEM: &str = "ARCHITECT_DESIGN_SYSTEM";
pub const ENV_PROVIDER: &str = "ARCHITECT_PROVIDER";
pub const ENV_MAX_RETRIES: &str = "ARCHITECT_MAX_RETRIES";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Design system JSON (relative to the project root)
    pub design_system: Option<String>,
    /// Preferred provider
    pub provider: Option<ProviderId>,
    #[serde(default)]
    pub limits: GenerationLimits,
    #[serde(default)]
    pub providers: HashMap<ProviderId, ProviderOverrides>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Path to the design system document
    pub design_system: PathBuf,
    /// Provider tried first
    pub provider: ProviderId,
    /// Retry ceiling and per-call timeout
    pub limits: GenerationLimits,
    /// Per-provider model/base-url overrides
    pub providers: HashMap<ProviderId, ProviderOverrides>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?
        .join("component-architect")
        .join(CONFIG_FILE);
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Directory relative config paths are resolved against
fn config_base_dir(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new("."));
    if parent.file_name().map_or(false, |name| name == CONFIG_DIR) {
        parent.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

/// Load configuration from all sources
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd, |var| std::env::var(var).ok())
}

/// Load configuration starting the file search at `start`, reading
/// variables through `env`
pub fn load_config_from<E>(start: &Path, env: E) -> Result<ResolvedConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let config_file = find_config_file(start);

    let (mut design_system, mut provider, mut limits, providers) = match config_file {
        Some(ref config_path) => {
            let config = load_config_file(config_path)?;
            let base_dir = config_base_dir(config_path);

            let design_system = resolve_path(
                &base_dir,
                config.design_system.as_deref().unwrap_or(DEFAULT_DESIGN_SYSTEM),
            );

            (
                design_system,
                config.provider.unwrap_or_default(),
                config.limits,
                config.providers,
            )
        }
        None => (
            start.join(DEFAULT_DESIGN_SYSTEM),
            ProviderId::default(),
            GenerationLimits::default(),
            HashMap::new(),
        ),
    };

    if let Some(path) = env(ENV_DESIGN_SYSTEM).filter(|p| !p.is_empty()) {
        design_system = resolve_path(start, &path);
    }

    if let Some(name) = env(ENV_PROVIDER).filter(|p| !p.is_empty()) {
        provider = name
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid {}", ENV_PROVIDER))?;
    }

    if let Some(value) = env(ENV_MAX_RETRIES).filter(|p| !p.is_empty()) {
        limits.max_retries = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_MAX_RETRIES, value))?;
    }

    limits.validate().context("Invalid generation limits")?;

    Ok(ResolvedConfig {
        design_system,
        provider,
        limits,
        providers,
        config_file,
    })
}
