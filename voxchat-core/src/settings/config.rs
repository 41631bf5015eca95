use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::voice::tts::replicate::{DEFAULT_BASE_URL, DEFAULT_MODEL_VERSION};
use crate::voice::tts::types::{VoiceParameters, VoicePreset};

pub const CHAT_API_KEY_ENV: &str = "VOXCHAT_CHAT_API_KEY";
pub const SPEECH_API_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

/// Upper bound for `speech.timeout_secs`; a reply is never held longer
pub const MAX_SPEECH_TIMEOUT_SECS: u64 = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing credential: set `{setting}` in the settings file or the {env} environment variable")]
    MissingCredential {
        setting: &'static str,
        env: &'static str,
    },

    #[error("Invalid setting `{setting}`: {reason}")]
    Invalid {
        setting: &'static str,
        reason: String,
    },

    #[error("Failed to read system prompt from {path:?}: {source}")]
    SystemPrompt {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            api_key: String::new(),
            model: default_chat_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ChatSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// When false replies are only printed
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_token: String,

    #[serde(default = "default_model_version")]
    pub model_version: String,

    #[serde(default)]
    pub voice: VoicePreset,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_speed")]
    pub speed: f64,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_length")]
    pub length: f64,

    /// Budget for one synthesis job, shared by all of its polls
    #[serde(default = "default_speech_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per HTTP request, including job creation which runs before the budget
    #[serde(default = "default_speech_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_speech_base_url(),
            api_token: String::new(),
            model_version: default_model_version(),
            voice: VoicePreset::default(),
            language: default_language(),
            speed: default_speed(),
            temperature: default_temperature(),
            length: default_length(),
            timeout_secs: default_speech_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_speech_request_timeout_secs(),
        }
    }
}

impl SpeechSettings {
    pub fn voice_parameters(&self) -> VoiceParameters {
        VoiceParameters {
            language: self.language.clone(),
            voice: self.voice,
            speed: self.speed,
            temperature: self.temperature,
            length: self.length,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Plain text file holding the system prompt. A missing file means the
    /// conversation starts without one.
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: PathBuf,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub speech: SpeechSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_prompt_path: default_system_prompt_path(),
            chat: ChatSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl Settings {
    /// Reject values the remote services cannot accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                setting: "chat.model",
                reason: "must not be empty".to_string(),
            });
        }

        if !self.speech.enabled {
            return Ok(());
        }

        for (setting, value) in [
            ("speech.speed", self.speech.speed),
            ("speech.temperature", self.speech.temperature),
            ("speech.length", self.speech.length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    setting,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if !(1..=MAX_SPEECH_TIMEOUT_SECS).contains(&self.speech.timeout_secs) {
            return Err(ConfigError::Invalid {
                setting: "speech.timeout_secs",
                reason: format!(
                    "must be between 1 and {MAX_SPEECH_TIMEOUT_SECS}, got {}",
                    self.speech.timeout_secs
                ),
            });
        }

        let budget_ms = self.speech.timeout_secs * 1000;
        if !(1..=budget_ms).contains(&self.speech.poll_interval_ms) {
            return Err(ConfigError::Invalid {
                setting: "speech.poll_interval_ms",
                reason: format!(
                    "must be between 1 and the {budget_ms} ms synthesis budget, got {}",
                    self.speech.poll_interval_ms
                ),
            });
        }

        if !(1..=MAX_SPEECH_TIMEOUT_SECS).contains(&self.speech.request_timeout_secs) {
            return Err(ConfigError::Invalid {
                setting: "speech.request_timeout_secs",
                reason: format!(
                    "must be between 1 and {MAX_SPEECH_TIMEOUT_SECS}, got {}",
                    self.speech.request_timeout_secs
                ),
            });
        }

        Ok(())
    }

    pub fn chat_api_key(&self) -> Result<String, ConfigError> {
        resolve_secret(&self.chat.api_key, "chat.api_key", CHAT_API_KEY_ENV, |name| {
            std::env::var(name).ok()
        })
    }

    pub fn speech_api_token(&self) -> Result<String, ConfigError> {
        resolve_secret(
            &self.speech.api_token,
            "speech.api_token",
            SPEECH_API_TOKEN_ENV,
            |name| std::env::var(name).ok(),
        )
    }

    /// Read the system prompt, relative paths resolving against `base_dir`
    pub fn load_system_prompt(&self, base_dir: &Path) -> Result<Option<String>, ConfigError> {
        let path = base_dir.join(&self.system_prompt_path);
        if !path.exists() {
            return Ok(None);
        }

        let prompt = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::SystemPrompt { path, source })?;

        Ok((!prompt.trim().is_empty()).then_some(prompt))
    }
}

/// Configured value first, then the environment
pub fn resolve_secret(
    configured: &str,
    setting: &'static str,
    env: &'static str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !configured.trim().is_empty() {
        return Ok(configured.trim().to_string());
    }

    lookup(env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingCredential { setting, env })
}

fn default_true() -> bool {
    true
}

fn default_chat_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_chat_model() -> String {
    "deepseek-reasoner".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_speech_request_timeout_secs() -> u64 {
    10
}

fn default_speech_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_speed() -> f64 {
    1.1
}

fn default_temperature() -> f64 {
    0.75
}

fn default_length() -> f64 {
    1.0
}

fn default_speech_timeout_secs() -> u64 {
    8
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_system_prompt_path() -> PathBuf {
    PathBuf::from("system_prompt.txt")
}
