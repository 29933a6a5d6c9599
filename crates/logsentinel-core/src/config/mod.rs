use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{AnalysisClient, SystemInstructionBuilder};
use crate::constants::{defaults, paths};
use crate::error::SentinelError;
use crate::llm::{GeminiClient, GenerationConfig, LlmClient};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LlmSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub thinking_budget: u32,
    /// Keep only this many most recent history turns per request.
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Appended to the built-in system instruction.
    #[serde(default)]
    pub extra_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub theme: String,
    pub show_timestamps: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: defaults::THEME.to_string(),
            show_timestamps: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmSettings {
                model: defaults::DEFAULT_MODEL.to_string(),
                api_key_env: defaults::API_KEY_ENV.to_string(),
                base_url: None,
                temperature: defaults::TEMPERATURE,
                thinking_budget: defaults::THINKING_BUDGET,
                history_limit: None,
                request_timeout_secs: None,
                extra_instructions: None,
            },
            ui: UiSettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unparsable.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring invalid config {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("Could not read config {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), SentinelError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SentinelError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SentinelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable specified in settings.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.llm.temperature,
            thinking_budget: self.llm.thinking_budget,
        }
    }

    pub fn system_instruction(&self) -> String {
        let mut builder = SystemInstructionBuilder::new();
        if let Some(ref extra) = self.llm.extra_instructions {
            builder = builder.with_additional_instructions(extra.clone());
        }
        builder.build()
    }

    /// Build the model client from the current settings.
    pub fn build_llm_client(&self) -> Result<Box<dyn LlmClient>, SentinelError> {
        let api_key = self.api_key().ok_or_else(|| {
            SentinelError::Config(format!(
                "API key not found: set the {} environment variable",
                self.llm.api_key_env
            ))
        })?;
        self.build_llm_client_with_key(api_key)
    }

    pub fn build_llm_client_with_key(
        &self,
        api_key: impl Into<String>,
    ) -> Result<Box<dyn LlmClient>, SentinelError> {
        let mut client = GeminiClient::new(api_key).with_model(self.llm.model.clone());
        if let Some(ref url) = self.llm.base_url {
            client = client.with_base_url(url.clone());
        }
        if let Some(secs) = self.llm.request_timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs))?;
        }
        Ok(Box::new(client))
    }

    /// Wrap an LLM client with the configured instruction and sampling.
    pub fn analysis_client(&self, llm: Box<dyn LlmClient>) -> Arc<AnalysisClient> {
        Arc::new(
            AnalysisClient::new(llm)
                .with_system_instruction(self.system_instruction())
                .with_generation_config(self.generation_config())
                .with_history_limit(self.llm.history_limit),
        )
    }

    /// Construct the shared analysis client once at startup.
    pub fn build_analysis_client(&self) -> Result<Arc<AnalysisClient>, SentinelError> {
        Ok(self.analysis_client(self.build_llm_client()?))
    }
}
