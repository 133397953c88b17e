//! Relevance grading of fused candidates (retrieval correction).
//!
//! One binary classification per candidate against the original question.
//! A malformed response gets exactly one retry, then the candidate is
//! conservatively marked irrelevant; transport failures and timeouts go
//! straight to irrelevant. Fused order is preserved.

use tracing::{debug, warn};

use regrag_core::traits::{ChunkStore, GenerativeModel};
use regrag_core::types::{FusedResult, GradedResult, Relevance};

/// Prefix of `text` of at most `max_chars` characters, never splitting a
/// code point.
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Returns the relevant subset of `fused`, in fused order. May be empty;
/// the orchestrator owns the forced-top-1 fallback for that case.
pub async fn grade_candidates(
    model: &dyn GenerativeModel,
    store: &dyn ChunkStore,
    question: &str,
    fused: &[FusedResult],
    snippet_chars: usize,
) -> Vec<GradedResult> {
    let mut relevant = Vec::new();

    for candidate in fused {
        let chunk = match store.get(&candidate.chunk_id) {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                warn!(chunk_id = %candidate.chunk_id, "fused candidate missing from chunk store");
                continue;
            }
            Err(e) => {
                warn!(chunk_id = %candidate.chunk_id, error = %e, "chunk store lookup failed");
                continue;
            }
        };

        let snippet = char_prefix(&chunk.text, snippet_chars);
        let verdict = grade_one(model, question, snippet).await;
        debug!(chunk_id = %candidate.chunk_id, ?verdict, "graded candidate");

        if verdict == Relevance::Relevant {
            relevant.push(GradedResult {
                fused: candidate.clone(),
                verdict,
                forced: false,
            });
        }
    }

    relevant
}

async fn grade_one(model: &dyn GenerativeModel, question: &str, snippet: &str) -> Relevance {
    match model.grade_relevance(question, snippet).await {
        Ok(verdict) => verdict,
        Err(e) if e.is_parse() => {
            warn!(error = %e, "malformed relevance verdict, retrying once");
            match model.grade_relevance(question, snippet).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(error = %e, "relevance grading failed twice, marking irrelevant");
                    Relevance::Irrelevant
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "relevance grading failed, marking irrelevant");
            Relevance::Irrelevant
        }
    }
}
