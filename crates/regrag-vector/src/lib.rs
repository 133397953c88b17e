//! LanceDB-backed nearest-neighbor index over child-chunk embeddings.
//!
//! Read-only adapter: the table is populated by the external index build.
//! A query embeds the text through the injected [`Embedder`], runs a vector
//! search (optionally narrowed by a metadata predicate), converts LanceDB's
//! `_distance` column into a similarity score, and returns deterministic,
//! id-tie-broken hits.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use tracing::debug;

use regrag_core::traits::{Embedder, VectorIndex};
use regrag_core::types::{MetadataFilter, ScoredChunk};

pub struct LanceVectorIndex {
    db: Connection,
    table_name: String,
    embedder: Arc<dyn Embedder>,
}

impl LanceVectorIndex {
    pub async fn open(db_path: &Path, table_name: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref())
            .execute()
            .await
            .with_context(|| format!("opening LanceDB at {}", db_path.display()))?;
        let names = db.table_names().execute().await?;
        if !names.contains(&table_name.to_string()) {
            return Err(anyhow!(
                "LanceDB table '{}' not found; run the index build first",
                table_name
            ));
        }
        Ok(Self {
            db,
            table_name: table_name.to_string(),
            embedder,
        })
    }
}

/// Compile a metadata filter into a LanceDB SQL predicate. Returns `None`
/// for an empty filter.
pub fn filter_predicate(filter: &MetadataFilter) -> Option<String> {
    if filter.is_empty() {
        return None;
    }
    let mut clauses = Vec::new();
    if let Some(audience) = &filter.audience {
        clauses.push(format!("audience = '{}'", audience.replace('\'', "''")));
    }
    if filter.latest_only {
        clauses.push("is_latest = true".to_string());
    }
    if filter.active_only {
        clauses.push("status = 'ACTIVE'".to_string());
    }
    Some(clauses.join(" AND "))
}

/// Descending score, ties by chunk id ascending, truncated to `k`.
pub fn rank_hits(mut hits: Vec<ScoredChunk>, k: usize) -> Vec<ScoredChunk> {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    hits.truncate(k);
    hits
}

#[async_trait]
impl VectorIndex for LanceVectorIndex {
    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredChunk>> {
        let query_vec = self.embedder.embed(query).await?;
        let table = self.db.open_table(&self.table_name).execute().await?;

        let mut vq = table.vector_search(query_vec)?.limit(k);
        if let Some(pred) = filter.and_then(filter_predicate) {
            debug!(%pred, "applying metadata predicate");
            vq = vq.only_if(pred);
        }
        let mut stream = vq.execute().await?;

        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let ids = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<arrow_array::StringArray>())
                .ok_or_else(|| anyhow!("id column missing from table '{}'", self.table_name))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>());
            for i in 0..batch.num_rows() {
                let score = match distances {
                    Some(d) => 1.0 - d.value(i),
                    None => 0.5,
                };
                hits.push(ScoredChunk {
                    chunk_id: ids.value(i).to_string(),
                    score,
                });
            }
        }
        Ok(rank_hits(hits, k))
    }
}
