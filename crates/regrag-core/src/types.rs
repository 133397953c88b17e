//! Domain types shared by the store, index, and pipeline crates.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Which tier of the two-level chunking a chunk belongs to.
///
/// Child chunks are small and embedded for retrieval precision; parent
/// chunks are the larger enclosing spans handed to the generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Child,
    Parent,
}

/// Whether the owning document is still in force.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocStatus {
    Active,
    Superseded,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Active => "ACTIVE",
            DocStatus::Superseded => "SUPERSEDED",
        }
    }
}

/// Document-level metadata carried on every chunk.
///
/// Tagged at index-build time; the pipeline only reads it, for metadata
/// filtering and for source attribution on the final answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    pub title: String,
    pub audience: String,
    pub date: String,
    pub status: DocStatus,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub cross_refs: Vec<String>,
    #[serde(default)]
    pub has_table: bool,
    #[serde(default)]
    pub is_latest: bool,
}

/// A contiguous span of source text, created once at index-build time and
/// immutable afterwards.
///
/// Invariant: `parent_id` is set iff `tier == Child`, and resolves to a
/// parent chunk in the same document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub tier: Tier,
    pub text: String,
    pub ordinal: usize,
    #[serde(default)]
    pub parent_id: Option<ChunkId>,
    pub metadata: ChunkMetadata,
}

/// The minimal surface returned by the vector index: a child-chunk id with
/// its similarity score (higher is better).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id: ChunkId,
    pub score: f32,
}

/// Optional constraints derived from the question and compiled into the
/// index query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
    pub audience: Option<String>,
    pub latest_only: bool,
    pub active_only: bool,
}

impl MetadataFilter {
    pub fn is_empty(&self) -> bool {
        self.audience.is_none() && !self.latest_only && !self.active_only
    }
}

/// One search query string. Index 0 is always the user's question verbatim;
/// higher indices are generated paraphrases. Scoped to one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariant {
    pub index: usize,
    pub text: String,
}

/// A single retrieval hit, tagged with the query it came from and its
/// 1-based rank within that query's result list.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub chunk_id: ChunkId,
    pub query_index: usize,
    pub rank: usize,
    pub score: f32,
}

/// A chunk after reciprocal rank fusion. The fused score is a function of
/// contributing ranks only, never of raw similarity scores.
#[derive(Debug, Clone)]
pub struct FusedResult {
    pub chunk_id: ChunkId,
    pub fused_score: f64,
    /// (query_index, rank) for every query that retrieved this chunk.
    pub contributing: Vec<(usize, usize)>,
}

/// Binary relevance verdict from the grading model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    Relevant,
    Irrelevant,
}

/// Grounding verdict over a draft answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grounding {
    Grounded,
    Partial,
    NotGrounded,
}

/// A fused candidate that survived (or was forced past) relevance grading.
#[derive(Debug, Clone)]
pub struct GradedResult {
    pub fused: FusedResult,
    pub verdict: Relevance,
    /// Set when every candidate was graded irrelevant and this one was
    /// carried forward as the top-1 fallback.
    pub forced: bool,
}

/// A parent chunk assembled for generation. Two relevant children sharing a
/// parent collapse into one unit, positioned at the first child's rank.
#[derive(Debug, Clone)]
pub struct ContextUnit {
    pub parent_id: ChunkId,
    pub doc_id: String,
    pub text: String,
    pub child_ids: Vec<ChunkId>,
    pub meta: ChunkMetadata,
}

/// Confidence label attached to the final answer. Advisory only; the
/// pipeline always returns the answer alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// One source document cited by the answer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceRef {
    pub doc_id: String,
    pub title: String,
    pub date: String,
    pub status: DocStatus,
    pub chunk_ids: Vec<ChunkId>,
}

/// Terminal pipeline output. Immutable once constructed; not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub confidence: Confidence,
    pub queries_used: Vec<String>,
    pub num_retrieved: usize,
    pub num_relevant: usize,
}
