//! Strict parsing of classification responses.
//!
//! Models drift: extra whitespace, casing, the odd trailing period. Every
//! response is trimmed and casefolded before matching, and anything that
//! still does not classify becomes a [`ModelError::Parse`] for the owning
//! component's fallback policy.

use regrag_core::error::ModelError;
use regrag_core::types::{Grounding, Relevance};

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Binary relevance verdict. `not_relevant` must be checked before
/// `relevant` since the latter is a substring of the former.
pub fn relevance(raw: &str) -> Result<Relevance, ModelError> {
    let text = normalize(raw);
    if text.contains("not_relevant") || text.contains("irrelevant") {
        return Ok(Relevance::Irrelevant);
    }
    if text.contains("relevant") {
        return Ok(Relevance::Relevant);
    }
    Err(ModelError::Parse(format!(
        "expected relevant/not_relevant, got: {raw:?}"
    )))
}

/// Three-way grounding verdict, same substring-ordering care as above.
pub fn grounding(raw: &str) -> Result<Grounding, ModelError> {
    let text = normalize(raw);
    if text.contains("not_grounded") {
        return Ok(Grounding::NotGrounded);
    }
    if text.contains("partial") {
        return Ok(Grounding::Partial);
    }
    if text.contains("grounded") {
        return Ok(Grounding::Grounded);
    }
    Err(ModelError::Parse(format!(
        "expected grounded/partial/not_grounded, got: {raw:?}"
    )))
}

/// Expansion output: one variant per line, blanks dropped, whitespace
/// trimmed. An empty result is a parse failure so the expander can fall
/// back to the literal question.
pub fn variants(raw: &str) -> Result<Vec<String>, ModelError> {
    let lines: Vec<String> = raw
        .lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '•']).trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(ModelError::Parse("expansion returned no variants".into()));
    }
    Ok(lines)
}
