//! Ask one question against the indexed regulatory corpus.

use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use regrag_core::config::{expand_path, Config};
use regrag_core::traits::{Embedder, GenerativeModel};
use regrag_llm::OpenAiCompatClient;
use regrag_pipeline::Pipeline;
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

    let store = Arc::new(JsonChunkStore::load(&expand_path(&paths.chunks_json))?);
    let client = Arc::new(OpenAiCompatClient::new(model_cfg));
    let embedder: Arc<dyn Embedder> = client.clone();
    let model: Arc<dyn GenerativeModel> = client;
    let index = Arc::new(
        LanceVectorIndex::open(&expand_path(&paths.lancedb_dir), &paths.table_name, embedder)
            .await?,
    );

    let pipeline = Pipeline::new(store, index, model, retrieval);
    let result = pipeline.answer(question).await?;

    println!("{}\n", result.answer);
    println!("Confidence: {}", result.confidence.as_str());
    println!(
        "Retrieved {} candidates, {} graded relevant",
        result.num_retrieved, result.num_relevant
    );
    println!("\nSources:");
    for source in &result.sources {
        println!(
            "  - {} | {} | {} | chunks: {}",
            source.title,
            source.date,
            source.status.as_str(),
            source.chunk_ids.join(", ")
        );
    }
    Ok(())
}
