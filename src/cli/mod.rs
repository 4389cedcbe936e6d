//! Command-line interface for component-architect.
//!
//! Provides commands for generating a component, running an interactive
//! session with conversation history, validating raw provider output,
//! and inspecting providers and configuration.

use std::collections::HashMap;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::adapters::registry::resolve_credential;
use crate::adapters::{ProviderOverrides, ProviderRegistry, ProviderSpec};
use crate::config::{load_config, ResolvedConfig};
use crate::core::{GenerationOutcome, Orchestrator, Validator};
use crate::domain::{AttemptEvent, DesignSystem, ProviderId, ValidationOutcome};

/// Exit code when retries ran out (best-effort output, warning)
pub const EXIT_EXHAUSTED: i32 = 2;

/// component-architect - design-system governed component generator
#[derive(Parser, Debug)]
#[command(name = "component-architect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a component from a natural-language request
    Generate {
        /// What to build, e.g. "a glassmorphism login card"
        request: String,

        /// Previous requests to use as context (repeatable, oldest first)
        #[arg(long = "history")]
        history: Vec<String>,

        /// Write component.html, component.css and component.ts here
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        options: GenerationOptions,
    },

    /// Interactive session: one request per line, history is kept
    Session {
        #[command(flatten)]
        options: GenerationOptions,
    },

    /// Validate raw provider output against the design system
    Validate {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Design system JSON (overrides config)
        #[arg(long)]
        design_system: Option<PathBuf>,
    },

    /// List providers in fallback order and whether a credential resolves
    Providers {
        /// Provider to list first
        #[arg(short, long)]
        provider: Option<ProviderId>,

        /// Runtime credential as provider=key (repeatable)
        #[arg(long = "api-key")]
        api_keys: Vec<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Options shared by the generating commands
#[derive(Args, Debug, Clone)]
pub struct GenerationOptions {
    /// Attempts per request, clamped to 1..=5
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub max_retries: Option<i64>,

    /// Provider to try first
    #[arg(short, long)]
    pub provider: Option<ProviderId>,

    /// Design system JSON (overrides config)
    #[arg(long)]
    pub design_system: Option<PathBuf>,

    /// Runtime credential as provider=key (repeatable); wins over env vars
    #[arg(long = "api-key")]
    pub api_keys: Vec<String>,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate {
                request,
                history,
                out,
                options,
            } => generate(&request, &history, out, &options).await,
            Commands::Session { options } => session(&options).await,
            Commands::Validate {
                input,
                design_system,
            } => validate(input, design_system),
            Commands::Providers { provider, api_keys } => list_providers(provider, &api_keys),
            Commands::Config => show_config(),
        }
    }
}

/// A configured orchestrator plus per-invocation choices
struct Session {
    orchestrator: Orchestrator,
    provider: ProviderId,
    max_retries: i64,
    json: bool,
}

impl Session {
    fn build(options: &GenerationOptions) -> Result<Self> {
        let config = load_config()?;
        let design_path = options
            .design_system
            .clone()
            .unwrap_or_else(|| config.design_system.clone());
        let design = Arc::new(DesignSystem::load(&design_path));

        let credentials = parse_api_keys(&options.api_keys)?;
        let registry = ProviderRegistry::from_credentials(
            &credentials,
            &config.providers,
            config.limits.provider_timeout(),
        );
        if registry.is_empty() {
            warn!("No provider credentials found, every attempt will use the offline generator");
        }

        Ok(Self {
            orchestrator: Orchestrator::new(design, Arc::new(registry), config.limits),
            provider: options.provider.unwrap_or(config.provider),
            max_retries: options
                .max_retries
                .unwrap_or(config.limits.max_retries as i64),
            json: options.json,
        })
    }

    async fn run(&self, request: &str, history: &[String]) -> GenerationOutcome {
        let json = self.json;
        self.orchestrator
            .orchestrate(request, self.max_retries, self.provider, history)
            .drive(|event| print_event(event, json))
            .await
    }
}

/// Generate a single component
async fn generate(
    request: &str,
    history: &[String],
    out: Option<PathBuf>,
    options: &GenerationOptions,
) -> Result<()> {
    if request.trim().is_empty() {
        anyhow::bail!("Request is empty");
    }

    let session = Session::build(options)?;
    let outcome = session.run(request, history).await;

    if let (Some(dir), Some(artifact)) = (out, outcome.artifact()) {
        for path in artifact.write_to(&dir)? {
            eprintln!("Wrote {}", path.display());
        }
    }

    if !outcome.is_success() {
        std::process::exit(EXIT_EXHAUSTED);
    }

    Ok(())
}

/// Interactive loop keeping the conversation history
async fn session(options: &GenerationOptions) -> Result<()> {
    let session = Session::build(options)?;
    let interactive = io::stdin().is_terminal();
    let mut history: Vec<String> = Vec::new();

    if interactive {
        eprintln!("Describe a component (':clear' resets history, Ctrl-D exits)");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            eprint!("> ");
            io::stderr().flush().ok();
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        let request = line.trim();

        if request.is_empty() {
            continue;
        }
        if request == ":clear" {
            history.clear();
            eprintln!("History cleared");
            continue;
        }

        session.run(request, &history).await;
        history.push(request.to_string());
    }

    Ok(())
}

/// Validate raw output from a file or stdin
fn validate(input: Option<PathBuf>, design_system: Option<PathBuf>) -> Result<()> {
    let design_path = match design_system {
        Some(path) => path,
        None => load_config()?.design_system,
    };
    let design = DesignSystem::load(&design_path);

    let raw = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            buffer
        }
    };

    match Validator::new(&design).validate(&raw) {
        ValidationOutcome::Valid(_) => {
            println!("VALID");
            Ok(())
        }
        ValidationOutcome::Invalid { errors, .. } => {
            println!("INVALID ({} issue(s))", errors.len());
            for error in &errors {
                println!("  - {}", error);
            }
            std::process::exit(1);
        }
    }
}

/// List providers in fallback order
fn list_providers(preferred: Option<ProviderId>, api_keys: &[String]) -> Result<()> {
    let config = load_config()?;
    let credentials = parse_api_keys(api_keys)?;
    let preferred = preferred.unwrap_or(config.provider);

    println!("{:<8} {:<28} {:<12} {}", "ID", "PROVIDER", "CREDENTIAL", "MODELS");
    println!("{}", "-".repeat(80));

    for id in ProviderId::fallback_order(preferred) {
        let explicit = credentials.get(&id).map(String::as_str);
        let credential = match resolve_credential(id, explicit, |var| std::env::var(var).ok()) {
            Some(_) if explicit.is_some_and(|k| !k.trim().is_empty()) => "runtime",
            Some(_) => "env",
            None => "missing",
        };

        let spec = provider_spec(id, &config.providers, config.limits.provider_timeout());
        println!(
            "{:<8} {:<28} {:<12} {}",
            id.as_str(),
            id.display_name(),
            credential,
            spec.models.join(", ")
        );
    }

    println!("{:<8} {:<28} {:<12} {}", "offline", "Offline templates", "-", "-");
    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = load_config()?;
    print_config(&config);
    Ok(())
}

fn print_config(config: &ResolvedConfig) {
    println!("Design system: {}", config.design_system.display());
    println!("Provider: {}", config.provider);
    println!("Max retries: {}", config.limits.max_retries);
    println!(
        "Provider timeout: {}s",
        config.limits.provider_timeout_seconds
    );
    match config.config_file {
        Some(ref path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }

    for id in ProviderId::ALL {
        let spec = provider_spec(id, &config.providers, config.limits.provider_timeout());
        println!("  {}: {} @ {}", id, spec.models.join(", "), spec.base_url);
    }
}

fn provider_spec(
    id: ProviderId,
    overrides: &HashMap<ProviderId, ProviderOverrides>,
    timeout: Duration,
) -> ProviderSpec {
    ProviderSpec::defaults(id, timeout)
        .with_overrides(overrides.get(&id).unwrap_or(&ProviderOverrides::default()))
}

/// Parse `provider=key` pairs
pub fn parse_api_keys(pairs: &[String]) -> Result<HashMap<ProviderId, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (name, key) = pair
                .split_once('=')
                .with_context(|| format!("Expected provider=key, got '{}'", redact(pair)))?;
            let id: ProviderId = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            Ok((id, key.trim().to_string()))
        })
        .collect()
}

/// Hide everything past the first few characters of a credential-ish string
fn redact(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{}...", visible)
}

/// Print one event as text or a JSON line
fn print_event(event: &AttemptEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "Failed to serialize event"),
        }
        return;
    }

    match event {
        AttemptEvent::Attempt { value } => println!("\n=== Attempt {} ===", value),
        AttemptEvent::Generating { value }
        | AttemptEvent::Validating { value }
        | AttemptEvent::Correcting { value } => println!("{}", value),
        AttemptEvent::Failed { value, errors } => {
            println!("FAILED: {}", value);
            for error in errors {
                println!("  - {}", error);
            }
        }
        AttemptEvent::Success { value, data } => {
            println!("SUCCESS: {}", value);
            print_artifact(data);
        }
        AttemptEvent::MaxRetriesReached { value, data } => {
            println!("WARNING: {}", value);
            if let Some(data) = data {
                print_artifact(data);
            }
        }
    }
}

fn print_artifact(artifact: &crate::domain::ComponentArtifact) {
    match serde_json::to_string_pretty(artifact) {
        Ok(pretty) => println!("{}", pretty),
        Err(e) => warn!(error = %e, "Failed to serialize artifact"),
    }
}
