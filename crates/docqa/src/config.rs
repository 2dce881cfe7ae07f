//! Configuration for the document Q&A service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Placeholder shipped in sample env files; treated as "not configured"
const PLACEHOLDER_API_KEY: &str = "your_groq_api_key_here";

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Upload limits
    pub upload: UploadConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding (Ollama) configuration
    pub embeddings: EmbeddingConfig,
    /// Hosted chat model configuration
    pub llm: LlmConfig,
    /// Hosted vision model configuration
    pub vision: VisionConfig,
    /// Local OCR configuration
    pub ocr: OcrConfig,
    /// Text-to-speech configuration
    pub tts: TtsConfig,
    /// Session storage configuration
    pub storage: StorageConfig,
}

impl RagConfig {
    /// Load configuration: defaults, then the TOML file named by `DOCQA_CONFIG`
    /// (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("DOCQA_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML configuration file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment-style overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.server.log_level = level.to_lowercase();
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.embeddings.base_url = url;
        }
        if let Some(url) = lookup("TTS_URL") {
            self.tts.base_url = url;
        }
    }

    /// Validate settings that must hold before the server starts
    pub fn validate(&self) -> Result<()> {
        let key = self.llm.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(Error::Config(
                "GROQ_API_KEY not set. Configure it in the environment or the config file".to_string(),
            ));
        }
        self.chunking.validate()?;
        if self.upload.max_file_size == 0 {
            return Err(Error::Config("upload.max_file_size must be positive".to_string()));
        }
        if !self.tts.voices.contains_key(&self.tts.default_language) {
            return Err(Error::Config(format!(
                "tts.voices has no voice for default language '{}'",
                self.tts.default_language
            )));
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
    /// Enable CORS (any origin)
    pub enable_cors: bool,
    /// Log level for the service's own targets
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            log_level: "info".to_string(),
        }
    }
}

/// Upload validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default: 20MB)
    pub max_file_size: usize,
    /// Accepted file extensions, with leading dot
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
            allowed_extensions: [".pdf", ".docx", ".xlsx", ".pptx", ".txt", ".jpg", ".jpeg", ".png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Check an extension (with leading dot, any case) against the allow list
    pub fn is_allowed(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.to_lowercase() == extension)
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Overlap must be smaller than the chunk size
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Embedding configuration (Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model (all-minilm is all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            timeout_secs: 60,
        }
    }
}

/// Hosted chat model configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Generation model name
    pub model: String,
    /// Maximum tokens in an answer
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "llama-3.1-70b-versatile".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

/// Hosted vision model configuration; shares the chat API endpoint and key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Describe images with the vision model
    pub enabled: bool,
    /// Vision model name
    pub model: String,
    /// Maximum tokens in a description
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "llama-3.2-90b-vision-preview".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Local OCR (tesseract) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Run OCR on images
    pub enabled: bool,
    /// tesseract binary
    pub command: String,
    /// tesseract language pack
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// Text-to-speech configuration (OpenAI-compatible `/audio/speech`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Speech API base URL, without the `/audio/speech` suffix
    pub base_url: String,
    /// Optional API key
    pub api_key: Option<String>,
    /// Speech model name
    pub model: String,
    /// Language used when a request names an unknown language
    pub default_language: String,
    /// Language tag to voice name
    pub voices: BTreeMap<String, String>,
    /// Longer input is truncated to this many characters
    pub max_chars: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        let mut voices = BTreeMap::new();
        voices.insert("en".to_string(), "en-US-AriaNeural".to_string());
        voices.insert("ta".to_string(), "en-IN-NeerjaNeural".to_string());

        Self {
            base_url: "http://localhost:5050/v1".to_string(),
            api_key: None,
            model: "tts-1".to_string(),
            default_language: "en".to_string(),
            voices,
            max_chars: 5000,
            timeout_secs: 60,
        }
    }
}

/// Session storage and extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root for per-session temp directories
    pub temp_root: PathBuf,
    /// Resolution used when rasterising PDF pages
    pub pdf_dpi: u32,
    /// pdftoppm binary
    pub rasterizer_command: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir().join("docqa"),
            pdf_dpi: 200,
            rasterizer_command: "pdftoppm".to_string(),
        }
    }
}
