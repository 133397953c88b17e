use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Retrieval and fusion knobs. Defaults follow the indexed corpus the
/// pipeline was tuned on; every field can be overridden from config.toml
/// or `REGRAG_RETRIEVAL_*` env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Total query variants per question, including the verbatim question.
    pub variant_count: usize,
    /// Nearest neighbors fetched per query variant.
    pub per_query_k: usize,
    /// Fused candidates kept for grading.
    pub fused_top_m: usize,
    /// RRF smoothing constant.
    pub rrf_k: u32,
    /// Passage prefix handed to the relevance grader.
    pub grade_snippet_chars: usize,
    /// Upper bound on assembled parent context, in characters.
    pub max_context_chars: usize,
    /// Context prefix handed to the grounding checker.
    pub grounding_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            variant_count: 3,
            per_query_k: 5,
            fused_top_m: 5,
            rrf_k: 60,
            grade_snippet_chars: 800,
            max_context_chars: 24_000,
            grounding_context_chars: 6_000,
        }
    }
}

/// External model endpoints and per-call timeout budgets (seconds).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// OpenAI-compatible base URL (Ollama, vLLM, LM Studio, ...).
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub temperature: f32,
    pub expand_timeout_secs: u64,
    pub grade_timeout_secs: u64,
    pub generate_timeout_secs: u64,
    pub grounding_timeout_secs: u64,
    pub embed_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: None,
            model: "gemma3:27b".to_string(),
            embedding_model: "all-minilm".to_string(),
            embedding_dim: 384,
            temperature: 0.1,
            expand_timeout_secs: 20,
            grade_timeout_secs: 15,
            generate_timeout_secs: 120,
            grounding_timeout_secs: 30,
            embed_timeout_secs: 15,
        }
    }
}

/// Locations of the index build's read-only artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub chunks_json: String,
    pub lancedb_dir: String,
    pub table_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            chunks_json: "data/processed/chunks.json".to_string(),
            lancedb_dir: "data/lancedb".to_string(),
            table_name: "child_chunks".to_string(),
        }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("REGRAG_"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn retrieval(&self) -> anyhow::Result<RetrievalConfig> {
        self.section("retrieval")
    }

    pub fn model(&self) -> anyhow::Result<ModelConfig> {
        self.section("model")
    }

    pub fn paths(&self) -> anyhow::Result<PathsConfig> {
        self.section("paths")
    }

    fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match self.figment.find_value(key) {
            Ok(_) => self
                .figment
                .extract_inner(key)
                .map_err(|e| anyhow::anyhow!("Failed to read section '{}': {}", key, e)),
            Err(_) => Ok(T::default()),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let retrieval: RetrievalConfig = self.section("retrieval")?;
        if retrieval.variant_count == 0 {
            return Err(Error::InvalidConfig("retrieval.variant_count must be >= 1".into()).into());
        }
        if retrieval.per_query_k == 0 || retrieval.fused_top_m == 0 {
            return Err(Error::InvalidConfig(
                "retrieval.per_query_k and retrieval.fused_top_m must be >= 1".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
