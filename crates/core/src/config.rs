use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LECTERN_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("LECTERN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            generation: GenerationConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}, max_upload={}MB", self.server.host, self.server.port, self.server.max_upload_mb);
        tracing::info!("  llm:         provider={}, model={}, configured={}", self.llm.provider, self.llm.active_model(&self.ollama), self.llm.is_configured());
        tracing::info!("  flashcards:  {}", self.generation.flashcards);
        tracing::info!("  summary:     {}", self.generation.summary);
        tracing::info!("  quiz:        {}", self.generation.quiz);
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_upload_mb: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 3001),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_parse(p, "MAX_UPLOAD_MB", 25),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

// ── LLM (Gemini / OpenAI / Anthropic) ────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "anthropic", "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    /// Per-request HTTP timeout applied by the provider client.
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini"),
            gemini_api_key: profiled_env_opt(p, "GOOGLE_GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-pro"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            timeout_secs: profiled_env_parse(p, "LLM_TIMEOUT_SECS", 60),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }

    /// Model name of the active provider, for logs and health output.
    pub fn active_model<'a>(&'a self, ollama: &'a OllamaConfig) -> &'a str {
        match self.provider.as_str() {
            "gemini" => &self.gemini_model,
            "openai" => &self.openai_model,
            "anthropic" | "claude" => &self.anthropic_model,
            "ollama" => &ollama.model,
            _ => "unknown",
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}

// ── Generation (per-task sampling) ────────────────────────────

/// Sampling parameters sent with one model call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl SamplingConfig {
    /// Higher temperature: flashcards favour phrasing variety.
    pub const FLASHCARDS: SamplingConfig = SamplingConfig {
        temperature: 0.7,
        top_p: 0.8,
        top_k: 40,
        max_output_tokens: 2048,
    };

    /// Lower temperature: summaries and quizzes favour factual consistency.
    pub const DOCUMENT: SamplingConfig = SamplingConfig {
        temperature: 0.3,
        top_p: 0.8,
        top_k: 40,
        max_output_tokens: 4000,
    };

    fn from_env_profiled(p: &str, prefix: &str, defaults: SamplingConfig) -> Self {
        Self {
            temperature: profiled_env_parse(p, &format!("{prefix}_TEMPERATURE"), defaults.temperature),
            top_p: profiled_env_parse(p, &format!("{prefix}_TOP_P"), defaults.top_p),
            top_k: profiled_env_parse(p, &format!("{prefix}_TOP_K"), defaults.top_k),
            max_output_tokens: profiled_env_parse(p, &format!("{prefix}_MAX_TOKENS"), defaults.max_output_tokens),
        }
    }
}

impl std::fmt::Display for SamplingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "temperature={}, top_p={}, top_k={}, max_tokens={}",
            self.temperature, self.top_p, self.top_k, self.max_output_tokens
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub flashcards: SamplingConfig,
    pub summary: SamplingConfig,
    pub quiz: SamplingConfig,
    pub default_flashcard_count: usize,
    pub max_flashcard_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            flashcards: SamplingConfig::FLASHCARDS,
            summary: SamplingConfig::DOCUMENT,
            quiz: SamplingConfig::DOCUMENT,
            default_flashcard_count: 5,
            max_flashcard_count: 20,
        }
    }
}

impl GenerationConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            flashcards: SamplingConfig::from_env_profiled(p, "FLASHCARDS", defaults.flashcards),
            summary: SamplingConfig::from_env_profiled(p, "SUMMARY", defaults.summary),
            quiz: SamplingConfig::from_env_profiled(p, "QUIZ", defaults.quiz),
            default_flashcard_count: profiled_env_parse(p, "DEFAULT_FLASHCARD_COUNT", defaults.default_flashcard_count),
            max_flashcard_count: profiled_env_parse(p, "MAX_FLASHCARD_COUNT", defaults.max_flashcard_count),
        }
    }

    /// Clamp a requested card count into `1..=max_flashcard_count`,
    /// substituting the default when none was requested.
    pub fn flashcard_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_flashcard_count)
            .clamp(1, self.max_flashcard_count.max(1))
    }
}
