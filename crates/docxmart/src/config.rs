//! Configuration for docXmart

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Response assembly configuration
    #[serde(default)]
    pub assembly: AssemblyConfig,
    /// Text generator configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Session lifecycle configuration
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Order: explicit path, then `DOCXMART_CONFIG`, then
    /// `<config dir>/docxmart/config.toml` if present, otherwise defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("DOCXMART_CONFIG").map(PathBuf::from))
            .or_else(|| {
                let default = Self::default_path()?;
                default.exists().then_some(default)
            });

        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docxmart").join("config.toml"))
    }

    /// Apply `DOCXMART_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("DOCXMART_API_KEY").or_else(|| lookup("AI71_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(backend) = lookup("DOCXMART_LLM_BACKEND") {
            match backend.to_lowercase().as_str() {
                "openai" => self.llm.backend = LlmBackend::OpenAi,
                "ollama" => self.llm.backend = LlmBackend::Ollama,
                other => tracing::warn!("Ignoring unknown DOCXMART_LLM_BACKEND '{}'", other),
            }
        }
        if let Some(url) = lookup("DOCXMART_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("DOCXMART_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(host) = lookup("DOCXMART_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCXMART_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid DOCXMART_PORT '{}'", port),
            }
        }
    }

    /// Check the configuration before serving any request
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_chars == 0 {
            return Err(Error::Config("chunking.max_chunk_chars must be positive".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be positive".to_string()));
        }
        if self.llm.backend == LlmBackend::OpenAi
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(Error::Config(
                "An API key is required for the openai backend (set DOCXMART_API_KEY)".to_string(),
            ));
        }
        if self.sessions.sweep_interval_secs == 0 {
            return Err(Error::Config(
                "sessions.sweep_interval_secs must be positive".to_string(),
            ));
        }
        if self.sessions.max_sessions == 0 {
            return Err(Error::Config("sessions.max_sessions must be positive".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub max_chunk_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 3000,
        }
    }
}

/// Response assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Pause after each successful chunk, in milliseconds
    pub pacing_ms: u64,
    /// Text inserted in place of a failed chunk; `{chunk}` is replaced by its number.
    /// When unset, failed chunks leave no trace in the transcript.
    pub gap_marker: Option<String>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 1000,
            gap_marker: None,
        }
    }
}

impl AssemblyConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

/// Text generator backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// OpenAI-compatible chat completions API (AI71 by default)
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

/// Text generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend selection
    pub backend: LlmBackend,
    /// API base URL
    pub base_url: String,
    /// API key (required for the openai backend)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed transport requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::OpenAi,
            base_url: "https://api.ai71.ai/v1".to_string(),
            api_key: None,
            model: "tiiuae/falcon-180b-chat".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Defaults for a local Ollama server
    pub fn ollama() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            ..Self::default()
        }
    }

    /// Timeout of a single HTTP attempt
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upper bound for one generation call including retries: every attempt
    /// may use the full per-attempt timeout, plus the 1s, 2s, 4s... backoff
    /// between attempts
    pub fn call_budget(&self) -> Duration {
        let attempts = u64::from(self.max_retries).saturating_add(1);
        let backoff_secs = 2u64
            .checked_pow(self.max_retries)
            .map_or(u64::MAX, |total| total - 1);

        Duration::from_secs(
            self.timeout_secs
                .saturating_mul(attempts)
                .saturating_add(backoff_secs),
        )
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle for longer than this are destroyed (default: 1 hour)
    pub idle_timeout_secs: u64,
    /// Maximum number of live sessions
    pub max_sessions: usize,
    /// How often the expiry sweep runs
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            max_sessions: 1000,
            sweep_interval_secs: 60,
        }
    }
}
