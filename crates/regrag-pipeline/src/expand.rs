//! Multi-query expansion.
//!
//! Variant 0 is always the user's question verbatim, so retrieval of the
//! literal query survives any expansion quality. Generated variants are
//! deduplicated after trim+casefold; shortfall is padded by repeating the
//! original, and a failed model call degrades to the single literal
//! variant.

use tracing::{debug, warn};

use regrag_core::traits::GenerativeModel;
use regrag_core::types::QueryVariant;

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Produce exactly `variant_count` query variants (or one, when expansion
/// fails entirely).
pub async fn expand_question(
    model: &dyn GenerativeModel,
    question: &str,
    variant_count: usize,
) -> Vec<QueryVariant> {
    let original = QueryVariant {
        index: 0,
        text: question.to_string(),
    };
    if variant_count <= 1 {
        return vec![original];
    }

    let generated = match model.expand(question, variant_count - 1).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!(error = %e, "query expansion degraded to literal question");
            return vec![original];
        }
    };

    let mut seen = vec![normalize(question)];
    let mut variants = vec![original];
    for line in generated {
        if variants.len() == variant_count {
            break;
        }
        let key = normalize(&line);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        variants.push(QueryVariant {
            index: variants.len(),
            text: line,
        });
    }

    // Model returned fewer distinct variants than asked for: repeat the
    // literal question rather than failing.
    while variants.len() < variant_count {
        variants.push(QueryVariant {
            index: variants.len(),
            text: question.to_string(),
        });
    }

    debug!(count = variants.len(), "expanded question");
    variants
}
