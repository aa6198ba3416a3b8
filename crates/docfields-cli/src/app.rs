//! Wiring from configuration to a finished batch pass.

use crate::cli::Cli;
use crate::config::{Config, ModelSettings, ProviderKind};
use crate::error::Result;
use docfields_domain::traits::LlmProvider;
use docfields_extractor::{BatchDriver, BatchReport};
use docfields_llm::{gemini, ollama, GeminiProvider, LlmError, OllamaProvider};
use std::time::Duration;
use tracing::info;

/// A provider chosen at runtime.
pub type DynProvider = Box<dyn LlmProvider<Error = LlmError>>;

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(input_root) = &cli.input_root {
        config.batch.input_root = input_root.clone();
    }
    if let Some(output_root) = &cli.output_root {
        config.batch.output_root = output_root.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.model.api_key = Some(api_key.clone());
    }
}

/// Build the provider described by `settings`.
pub fn build_provider(settings: &ModelSettings) -> Result<DynProvider> {
    let timeout = settings.timeout_secs.map(Duration::from_secs);

    let provider: DynProvider = match settings.provider {
        ProviderKind::Gemini => {
            let mut provider = GeminiProvider::new(
                settings.endpoint.as_deref().unwrap_or(gemini::DEFAULT_ENDPOINT),
                settings.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL),
                settings.api_key.clone().unwrap_or_default(),
            )?
            .with_max_retries(settings.max_retries);
            if let Some(timeout) = timeout {
                provider = provider.with_timeout(timeout);
            }
            info!("Using Gemini model '{}'", provider.model());
            Box::new(provider)
        }
        ProviderKind::Ollama => {
            let model = settings.model.as_deref().unwrap_or(ollama::DEFAULT_MODEL);
            let mut provider = OllamaProvider::new(
                settings.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT),
                model,
            )
            .with_max_retries(settings.max_retries);
            if let Some(timeout) = timeout {
                provider = provider.with_timeout(timeout);
            }
            info!("Using Ollama model '{}'", model);
            Box::new(provider)
        }
    };
    Ok(provider)
}

/// Load configuration, build the provider and run one batch pass.
pub fn execute(cli: &Cli) -> Result<BatchReport> {
    let (mut config, source) = Config::load(cli.config.as_deref())?;
    match &source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    apply_overrides(&mut config, cli);

    let registry = config.registry()?;
    info!("Label registry covers {} doctypes", registry.len());

    let provider = build_provider(&config.model)?;
    let driver = BatchDriver::new(provider.as_ref(), registry, config.batch);
    Ok(driver.process_documents()?)
}
