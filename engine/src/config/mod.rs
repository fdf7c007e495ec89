//! Configuration management
//!
//! This module handles loading, validation, and management of the helpdesk
//! configuration. Configuration is stored in TOML format at ~/.helpdesk/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: log level, data directory
//! - **llm**: Gemini generation and embedding settings
//! - **knowledge**: policy corpus location, vector index path, retrieval depth
//! - **memory**: conversation memory window
//! - **web**: bind address for the web adapter
//!
//! API keys are never stored here. See [`crate::secrets`].
//!
//! # Examples
//!
//! ```no_run
//! use helpdesk_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Policies: {:?}", config.knowledge.policies_dir);
//! println!("Model: {}", config.llm.gemini.model);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Knowledge base configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Conversation memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Web adapter configuration
    #[serde(default)]
    pub web: WebConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LLMConfig {
    /// Gemini provider settings
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Generation model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Embedding model name (with the `models/` prefix)
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    // Note: API key comes from GOOGLE_API_KEY or the OS keychain, not from config
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory holding IT policy and guide documents (`**/*.md`)
    #[serde(default = "default_policies_dir")]
    pub policies_dir: PathBuf,

    /// Location of the persisted vector index
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Number of documents retrieved as context per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of retained turns (user and agent turns count separately)
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

/// Web adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Interface to bind
    #[serde(default = "default_web_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.helpdesk")
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_embedding_model() -> String {
    "models/embedding-001".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_policies_dir() -> PathBuf {
    PathBuf::from("./it_policies")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("faiss_index_it_policies/index.json")
}

fn default_top_k() -> usize {
    4
}

fn default_max_turns() -> usize {
    10
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    7860
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            policies_dir: default_policies_dir(),
            index_path: default_index_path(),
            top_k: default_top_k(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.helpdesk/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Load configuration from `path`, or fall back to the built-in defaults when
    /// the file does not exist. Nothing is written to `path`.
    pub fn load_or_default(path: &Path) -> Result<Self, EngineError> {
        if path.exists() {
            return Self::load_from_path(path);
        }

        let mut config = Self::default();
        config.validate_and_process()?;
        Ok(config)
    }

    /// Parse, validate, and process configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        // Serialize before processing so the file keeps the portable ~ paths
        let toml_string = toml::to_string_pretty(&Self::default())
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        let mut config = Self::default();
        config.validate_and_process()?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.helpdesk/config.toml)
    pub fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".helpdesk").join("config.toml"))
    }

    /// Override the configured log level (the `--log` flag)
    pub fn set_log_level(&mut self, level: &str) -> Result<(), EngineError> {
        let level = level.to_lowercase();
        validate_log_level(&level)?;
        self.core.log_level = level;
        Ok(())
    }

    /// Validate and process configuration
    ///
    /// Validates values, expands ~ in paths, and creates the data directory.
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        validate_log_level(&self.core.log_level)?;

        let temperature = self.llm.gemini.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(EngineError::Config(
                "llm.gemini.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.llm.gemini.timeout_secs == 0 {
            return Err(EngineError::Config(
                "llm.gemini.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.knowledge.top_k == 0 {
            return Err(EngineError::Config(
                "knowledge.top_k must be at least 1".to_string(),
            ));
        }

        if self.memory.max_turns < 2 {
            return Err(EngineError::Config(
                "memory.max_turns must be at least 2 (one exchange)".to_string(),
            ));
        }

        self.knowledge.policies_dir = expand_path(&self.knowledge.policies_dir)?;
        self.knowledge.index_path = expand_path(&self.knowledge.index_path)?;
        self.core.data_dir = expand_path(&self.core.data_dir)?;

        if !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                EngineError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        Ok(())
    }
}

fn validate_log_level(level: &str) -> Result<(), EngineError> {
    const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    if VALID_LOG_LEVELS.contains(&level) {
        Ok(())
    } else {
        Err(EngineError::Config(format!(
            "Invalid log level '{}'. Must be one of: {}",
            level,
            VALID_LOG_LEVELS.join(", ")
        )))
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
