use async_trait::async_trait;

use crate::error::ModelError;
use crate::types::{Chunk, Grounding, MetadataFilter, Relevance, ScoredChunk};

/// Read-only access to the two-tier chunk corpus. Constructed once at
/// process start from the index build's artifact; shared across
/// invocations without locking.
pub trait ChunkStore: Send + Sync {
    fn get(&self, id: &str) -> anyhow::Result<Option<Chunk>>;

    /// Resolve a child chunk to its owning parent. `None` when either the
    /// child or the parent is missing from the store.
    fn parent_of(&self, child_id: &str) -> anyhow::Result<Option<Chunk>>;
}

/// Nearest-neighbor search over child-chunk embeddings. Wraps the external
/// embedding function; query text goes in, scored chunk ids come out.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns up to `k` hits ordered by descending similarity, ties broken
    /// by chunk id ascending. A small corpus may yield fewer than `k`.
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> anyhow::Result<Vec<ScoredChunk>>;
}

/// External embedding function with a fixed dimensionality matching the
/// persisted index.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;
}

/// The four call shapes of the external generative model. Every call
/// carries its own timeout, enforced by the implementation.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Ask for `n` alternative phrasings of the question, one per line.
    async fn expand(&self, question: &str, n: usize) -> Result<Vec<String>, ModelError>;

    /// Binary classification: is this passage useful for answering the
    /// question?
    async fn grade_relevance(
        &self,
        question: &str,
        passage: &str,
    ) -> Result<Relevance, ModelError>;

    /// Draft an answer strictly from the supplied context blocks.
    async fn generate(&self, question: &str, context_blocks: &str) -> Result<String, ModelError>;

    /// Classify how well the draft answer is supported by the context.
    async fn grade_grounding(
        &self,
        answer: &str,
        context_blocks: &str,
    ) -> Result<Grounding, ModelError>;
}
