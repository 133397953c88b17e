//! Per-variant candidate retrieval.
//!
//! Fans out one vector search per query variant and fans back in before
//! fusion. The searches are independent and share no mutable state, so
//! they run concurrently. A variant that errors contributes an empty list;
//! total emptiness is the orchestrator's problem.

use futures::future::join_all;
use tracing::warn;

use regrag_core::traits::VectorIndex;
use regrag_core::types::{Candidate, MetadataFilter, QueryVariant};

/// Below this many filtered hits the retriever retries without the filter,
/// since an over-narrow predicate starves fusion.
const MIN_FILTERED_HITS: usize = 2;

pub async fn retrieve_candidates(
    index: &dyn VectorIndex,
    variants: &[QueryVariant],
    k: usize,
    filter: Option<&MetadataFilter>,
) -> Vec<Vec<Candidate>> {
    let searches = variants
        .iter()
        .map(|variant| search_one(index, variant, k, filter));
    join_all(searches).await
}

async fn search_one(
    index: &dyn VectorIndex,
    variant: &QueryVariant,
    k: usize,
    filter: Option<&MetadataFilter>,
) -> Vec<Candidate> {
    let hits = match filter {
        Some(f) => match index.search(&variant.text, k, Some(f)).await {
            Ok(hits) if hits.len() >= MIN_FILTERED_HITS => Ok(hits),
            Ok(_) => index.search(&variant.text, k, None).await,
            Err(e) => {
                warn!(query = %variant.text, error = %e, "filtered search failed, retrying unfiltered");
                index.search(&variant.text, k, None).await
            }
        },
        None => index.search(&variant.text, k, None).await,
    };

    match hits {
        Ok(hits) => hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| Candidate {
                chunk_id: hit.chunk_id,
                query_index: variant.index,
                rank: i + 1,
                score: hit.score,
            })
            .collect(),
        Err(e) => {
            // Other variants still contribute to fusion.
            warn!(query = %variant.text, error = %e, "variant retrieval failed");
            Vec::new()
        }
    }
}
