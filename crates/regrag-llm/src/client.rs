use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use regrag_core::config::ModelConfig;
use regrag_core::error::ModelError;
use regrag_core::traits::{Embedder, GenerativeModel};
use regrag_core::types::{Grounding, Relevance};

use crate::parse;
use crate::prompts::PromptSet;

/// Client for any endpoint following the OpenAI chat-completions and
/// embeddings API shapes. One instance is shared across concurrent
/// invocations; it holds no mutable state.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    cfg: ModelConfig,
    prompts: PromptSet,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

impl OpenAiCompatClient {
    pub fn new(cfg: ModelConfig) -> Self {
        Self::with_prompts(cfg, PromptSet::default())
    }

    pub fn with_prompts(cfg: ModelConfig, prompts: PromptSet) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
            prompts,
        }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        timeout_secs: u64,
    ) -> Result<serde_json::Value, ModelError> {
        let url = format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path);
        debug!(%url, timeout_secs, "model request");

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.cfg.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        // The budget covers the whole exchange: a body that stalls after
        // the headers arrive must trip the timeout like a stalled connect.
        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| ModelError::Request(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| ModelError::Request(e.to_string()))?;
            Ok::<_, ModelError>((status, text))
        };
        let (status, text) = tokio::time::timeout(Duration::from_secs(timeout_secs), exchange)
            .await
            .map_err(|_| ModelError::Timeout(timeout_secs))??;

        if !status.is_success() {
            return Err(ModelError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| ModelError::Parse(format!("invalid JSON: {e}")))
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        timeout_secs: u64,
    ) -> Result<String, ModelError> {
        let body = json!({
            "model": self.cfg.model,
            "temperature": self.cfg.temperature,
            "stream": false,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });
        let value = self.post("chat/completions", body, timeout_secs).await?;
        let parsed: ChatResponse = serde_json::from_value(value)
            .map_err(|e| ModelError::Parse(format!("unexpected completion shape: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ModelError::Parse("completion had no choices".into()))
    }
}

#[async_trait]
impl GenerativeModel for OpenAiCompatClient {
    async fn expand(&self, question: &str, n: usize) -> Result<Vec<String>, ModelError> {
        let system = self.prompts.expand_system.replace("{n}", &n.to_string());
        let user = format!("Original question: {question}");
        let raw = self
            .chat(&system, &user, self.cfg.expand_timeout_secs)
            .await?;
        parse::variants(&raw)
    }

    async fn grade_relevance(
        &self,
        question: &str,
        passage: &str,
    ) -> Result<Relevance, ModelError> {
        let user = format!("Document excerpt:\n{passage}\n\nQuestion: {question}");
        let raw = self
            .chat(
                &self.prompts.relevance_system,
                &user,
                self.cfg.grade_timeout_secs,
            )
            .await?;
        parse::relevance(&raw)
    }

    async fn generate(&self, question: &str, context_blocks: &str) -> Result<String, ModelError> {
        let user = format!(
            "{context_blocks}\n\nQuestion: {question}\n\n\
             Provide a comprehensive, well-structured answer."
        );
        self.chat(
            &self.prompts.answer_system,
            &user,
            self.cfg.generate_timeout_secs,
        )
        .await
    }

    async fn grade_grounding(
        &self,
        answer: &str,
        context_blocks: &str,
    ) -> Result<Grounding, ModelError> {
        let user = format!("Source documents:\n{context_blocks}\n\nAnswer:\n{answer}");
        let raw = self
            .chat(
                &self.prompts.grounding_system,
                &user,
                self.cfg.grounding_timeout_secs,
            )
            .await?;
        parse::grounding(&raw)
    }
}

#[async_trait]
impl Embedder for OpenAiCompatClient {
    fn dim(&self) -> usize {
        self.cfg.embedding_dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let body = json!({
            "model": self.cfg.embedding_model,
            "input": [text],
        });
        let value = self
            .post("embeddings", body, self.cfg.embed_timeout_secs)
            .await?;
        let parsed: EmbeddingsResponse = serde_json::from_value(value)
            .map_err(|e| ModelError::Parse(format!("unexpected embeddings shape: {e}")))?;
        let row = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Parse("embeddings response had no rows".into()))?;
        if row.embedding.len() != self.cfg.embedding_dim {
            return Err(ModelError::Parse(format!(
                "embedding dimension {} does not match configured {}",
                row.embedding.len(),
                self.cfg.embedding_dim
            )));
        }
        Ok(row.embedding)
    }
}
