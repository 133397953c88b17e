//! Reciprocal Rank Fusion: score = Σ 1/(κ + rank).
//!
//! Merges the per-variant candidate lists into one ranking using ranks
//! only, never raw similarity scores, so heterogeneous query variants fuse
//! on equal footing and consensus across phrasings outranks a single
//! strong hit. Ties break by contributing-query count descending, then
//! chunk id ascending, which makes the output fully deterministic.

use std::collections::HashMap;

use regrag_core::types::{Candidate, ChunkId, FusedResult};

pub fn reciprocal_rank_fusion(
    lists: &[Vec<Candidate>],
    rrf_k: u32,
    top_m: usize,
) -> Vec<FusedResult> {
    let mut fused: HashMap<ChunkId, FusedResult> = HashMap::new();

    for list in lists {
        for candidate in list {
            let entry = fused
                .entry(candidate.chunk_id.clone())
                .or_insert_with(|| FusedResult {
                    chunk_id: candidate.chunk_id.clone(),
                    fused_score: 0.0,
                    contributing: Vec::new(),
                });
            entry.fused_score += 1.0 / (f64::from(rrf_k) + candidate.rank as f64);
            entry.contributing.push((candidate.query_index, candidate.rank));
        }
    }

    let mut results: Vec<FusedResult> = fused.into_values().collect();
    results.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.contributing.len().cmp(&a.contributing.len()))
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    results.truncate(top_m);
    results
}
