use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::RetryPolicy;

const ENV_PREFIX: &str = "APP";

/// Service configuration. Every section has defaults, so an empty source
/// yields a runnable local setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub speech: SpeechSettings,
    pub processing: ProcessingSettings,
    pub voices: VoiceSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{env}.toml` (optional) under `APP__`-prefixed
    /// environment variables, e.g. `APP__LLM__API_KEY`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("voices.male")
                    .with_list_parse_key("voices.female"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_mb: 25,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub concurrency: usize,
    pub retry_attempts: u32,
    pub retry_step_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            model: "eleven_multilingual_v2".to_string(),
            concurrency: 4,
            retry_attempts: 3,
            retry_step_ms: 1000,
        }
    }
}

impl SpeechSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.retry_attempts, Duration::from_millis(self.retry_step_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub max_chunk_size: usize,
    pub lines_per_minute: u32,
    pub queue_capacity: usize,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            max_chunk_size: 8000,
            lines_per_minute: 60,
            queue_capacity: 32,
            retry_max_attempts: 4,
            retry_initial_delay_ms: 500,
            retry_max_delay_ms: 8000,
        }
    }
}

impl ProcessingSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            ..RetryPolicy::exponential(
                self.retry_max_attempts,
                Duration::from_millis(self.retry_initial_delay_ms),
            )
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub male: Vec<String>,
    pub female: Vec<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            male: vec![
                "pNInz6obpgDQGcFmaJgB".to_string(),
                "ErXwobaYiN019PkySvjV".to_string(),
                "VR6AewLTigWG4xSOukaG".to_string(),
            ],
            female: vec![
                "21m00Tcm4TlvDq8ikWAM".to_string(),
                "EXAVITQu4vr4xnSDxMaL".to_string(),
                "MF3mGyEYCl7XYWbV9V3O".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub base_path: PathBuf,
    pub public_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./data/blobs"),
            public_url: "http://localhost:8080/media".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: String,
    pub filter: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
            filter: None,
        }
    }
}
