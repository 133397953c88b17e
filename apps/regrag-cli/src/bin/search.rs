//! Retrieval diagnostic: expand, retrieve, and fuse without generation.
//!
//! Prints the fused candidate list so retrieval quality can be inspected
//! before spending a generation call.

use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use regrag_core::config::{expand_path, Config};
use regrag_core::traits::{ChunkStore, Embedder, GenerativeModel};
use regrag_llm::OpenAiCompatClient;
use regrag_pipeline::{expand, filter, fuse, retrieve};
use regrag_store::JsonChunkStore;
use regrag_vector::LanceVectorIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} \"<question>\"", args[0]);
        std::process::exit(1);
    }
    let question = &args[1];

    let config = Config::load()?;
    let paths = config.paths()?;
    let retrieval = config.retrieval()?;
    let model_cfg = config.model()?;

    let store = JsonChunkStore::load(&expand_path(&paths.chunks_json))?;
    let client = Arc::new(OpenAiCompatClient::new(model_cfg));
    let embedder: Arc<dyn Embedder> = client.clone();
    let model: Arc<dyn GenerativeModel> = client;
    let index =
        LanceVectorIndex::open(&expand_path(&paths.lancedb_dir), &paths.table_name, embedder)
            .await?;

    let variants = expand::expand_question(model.as_ref(), question, retrieval.variant_count).await;
    println!("Queries:");
    for v in &variants {
        println!("  [{}] {}", v.index, v.text);
    }

    let meta_filter = filter::build_metadata_filter(question);
    if let Some(f) = &meta_filter {
        println!("Metadata filter: {f:?}");
    }

    let lists = retrieve::retrieve_candidates(
        &index,
        &variants,
        retrieval.per_query_k,
        meta_filter.as_ref(),
    )
    .await;
    let fused = fuse::reciprocal_rank_fusion(&lists, retrieval.rrf_k, retrieval.fused_top_m);

    println!("\nFused candidates ({}):", fused.len());
    for (i, result) in fused.iter().enumerate() {
        let label = match store.get(&result.chunk_id)? {
            Some(chunk) => format!("{} ({})", chunk.metadata.title, chunk.doc_id),
            None => "<not in chunk store>".to_string(),
        };
        println!(
            "  {}. score={:.5} queries={} id={} {}",
            i + 1,
            result.fused_score,
            result.contributing.len(),
            result.chunk_id,
            label
        );
    }
    Ok(())
}
