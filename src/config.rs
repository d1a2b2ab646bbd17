//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `RELAY_LOG_LEVEL` and `INFERENCE_MODEL` env overrides.
//! Secrets (`INFERENCE_API_KEY`, `TELEGRAM_BOT_TOKEN`) are never read from TOML.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// PTY (console) channel configuration.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    pub enabled: bool,
}

/// Telegram channel configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub enabled: bool,
}

/// Healthcheck listener configuration.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub enabled: bool,
    /// Socket address to bind the health listener to.
    pub bind: String,
}

#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub pty: PtyConfig,
    pub telegram: TelegramConfig,
    pub health: HealthConfig,
}

/// Text-generation parameters, identical for every candidate of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

/// URL templates for the three endpoint formats. `{model}` is replaced with
/// the model id where present.
#[derive(Debug, Clone)]
pub struct EndpointsConfig {
    pub chat_url: String,
    pub generation_url: String,
    pub routed_generation_url: String,
}

/// Inference orchestrator configuration (`[inference]`).
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Preferred model, tried first.
    pub model: String,
    /// Known-good public models tried after the preferred one, in order.
    pub fallback_models: Vec<String>,
    /// Maximum number of turns kept per user.
    pub max_history: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    pub generation: GenerationConfig,
    pub endpoints: EndpointsConfig,
}

/// Fully-resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    /// Persona system-prompt file; `None` selects the built-in persona.
    pub persona_file: Option<PathBuf>,
    pub comms: CommsConfig,
    pub inference: InferenceConfig,
    /// From `INFERENCE_API_KEY`. `None` disables the orchestrator.
    pub inference_api_key: Option<String>,
}

impl Config {
    pub fn comms_pty_should_load(&self) -> bool {
        self.comms.pty.enabled
    }

    pub fn comms_telegram_should_load(&self) -> bool {
        self.comms.telegram.enabled
    }

    pub fn health_should_load(&self) -> bool {
        self.comms.health.enabled
    }
}

/// Values taken from the environment. Tests construct this directly instead
/// of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("RELAY_LOG_LEVEL").ok(),
            model: env::var("INFERENCE_MODEL").ok(),
            api_key: env::var("INFERENCE_API_KEY").ok(),
        }
    }
}

// ── Raw TOML shape ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawConfig {
    relay: RawRelay,
    #[serde(default)]
    comms: RawComms,
    #[serde(default)]
    inference: RawInference,
}

#[derive(Deserialize)]
struct RawRelay {
    bot_name: String,
    log_level: String,
    #[serde(default)]
    persona_file: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    pty: RawPty,
    #[serde(default)]
    telegram: RawTelegram,
    #[serde(default)]
    health: RawHealth,
}

#[derive(Deserialize)]
struct RawPty {
    #[serde(default = "default_false")]
    enabled: bool,
}

#[derive(Deserialize)]
struct RawTelegram {
    /// Defaults to `true`: the relay is a Telegram bot first.
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize)]
struct RawHealth {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_health_bind")]
    bind: String,
}

#[derive(Deserialize)]
struct RawInference {
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_fallback_models")]
    fallback_models: Vec<String>,
    #[serde(default = "default_max_history")]
    max_history: usize,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default)]
    generation: RawGeneration,
    #[serde(default)]
    endpoints: RawEndpoints,
}

#[derive(Deserialize)]
struct RawGeneration {
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_new_tokens")]
    max_new_tokens: u32,
    #[serde(default = "default_top_p")]
    top_p: f32,
    #[serde(default = "default_repetition_penalty")]
    repetition_penalty: f32,
}

#[derive(Deserialize)]
struct RawEndpoints {
    #[serde(default = "default_chat_url")]
    chat_url: String,
    #[serde(default = "default_generation_url")]
    generation_url: String,
    #[serde(default = "default_routed_generation_url")]
    routed_generation_url: String,
}

impl Default for RawPty {
    fn default() -> Self {
        Self { enabled: false }
    }
}

impl Default for RawTelegram {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for RawHealth {
    fn default() -> Self {
        Self { enabled: true, bind: default_health_bind() }
    }
}

impl Default for RawInference {
    fn default() -> Self {
        Self {
            model: default_model(),
            fallback_models: default_fallback_models(),
            max_history: default_max_history(),
            timeout_seconds: default_timeout_seconds(),
            generation: RawGeneration::default(),
            endpoints: RawEndpoints::default(),
        }
    }
}

impl Default for RawGeneration {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_new_tokens: default_max_new_tokens(),
            top_p: default_top_p(),
            repetition_penalty: default_repetition_penalty(),
        }
    }
}

impl Default for RawEndpoints {
    fn default() -> Self {
        Self {
            chat_url: default_chat_url(),
            generation_url: default_generation_url(),
            routed_generation_url: default_routed_generation_url(),
        }
    }
}

fn default_model() -> String { "mistralai/Mistral-7B-Instruct-v0.2".to_string() }
fn default_fallback_models() -> Vec<String> {
    vec![
        "HuggingFaceH4/zephyr-7b-beta".to_string(),
        "microsoft/Phi-3-mini-4k-instruct".to_string(),
        "google/gemma-2-2b-it".to_string(),
    ]
}
fn default_max_history() -> usize { 10 }
fn default_timeout_seconds() -> u64 { 60 }
fn default_temperature() -> f32 { 0.8 }
fn default_max_new_tokens() -> u32 { 250 }
fn default_top_p() -> f32 { 0.9 }
fn default_repetition_penalty() -> f32 { 1.1 }
fn default_chat_url() -> String { "https://router.huggingface.co/v1/chat/completions".to_string() }
fn default_generation_url() -> String { "https://api-inference.huggingface.co/models/{model}".to_string() }
fn default_routed_generation_url() -> String {
    "https://router.huggingface.co/hf-inference/models/{model}".to_string()
}
fn default_health_bind() -> String { "0.0.0.0:8080".to_string() }

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    load_from(Path::new("config/default.toml"), &EnvOverrides::from_env())
}

/// Internal loader: accepts an explicit path and explicit overrides.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let r = parsed.relay;
    let inf = parsed.inference;

    if inf.max_history == 0 {
        return Err(AppError::Config("inference.max_history must be at least 1".into()));
    }

    let model = non_empty(overrides.model.clone()).unwrap_or(inf.model);

    Ok(Config {
        bot_name: r.bot_name,
        log_level: non_empty(overrides.log_level.clone()).unwrap_or(r.log_level),
        persona_file: r.persona_file.as_deref().map(expand_home),
        comms: CommsConfig {
            pty: PtyConfig { enabled: parsed.comms.pty.enabled },
            telegram: TelegramConfig { enabled: parsed.comms.telegram.enabled },
            health: HealthConfig {
                enabled: parsed.comms.health.enabled,
                bind: parsed.comms.health.bind,
            },
        },
        inference: InferenceConfig {
            model,
            fallback_models: inf.fallback_models,
            max_history: inf.max_history,
            timeout_seconds: inf.timeout_seconds,
            generation: GenerationConfig {
                temperature: inf.generation.temperature,
                max_new_tokens: inf.generation.max_new_tokens,
                top_p: inf.generation.top_p,
                repetition_penalty: inf.generation.repetition_penalty,
            },
            endpoints: EndpointsConfig {
                chat_url: inf.endpoints.chat_url,
                generation_url: inf.endpoints.generation_url,
                routed_generation_url: inf.endpoints.routed_generation_url,
            },
        },
        inference_api_key: non_empty(overrides.api_key.clone()),
    })
}

/// Blank env values count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// `InferenceConfig` pointing every endpoint at `base_url`.
#[doc(hidden)]
pub fn inference_config_for(base_url: &str, model: &str, fallbacks: &[&str]) -> InferenceConfig {
    InferenceConfig {
        model: model.to_string(),
        fallback_models: fallbacks.iter().map(|m| m.to_string()).collect(),
        max_history: default_max_history(),
        timeout_seconds: 5,
        generation: GenerationConfig {
            temperature: default_temperature(),
            max_new_tokens: default_max_new_tokens(),
            top_p: default_top_p(),
            repetition_penalty: default_repetition_penalty(),
        },
        endpoints: EndpointsConfig {
            chat_url: format!("{base_url}/v1/chat/completions"),
            generation_url: format!("{base_url}/models/{{model}}"),
            routed_generation_url: format!("{base_url}/hf-inference/models/{{model}}"),
        },
    }
}
