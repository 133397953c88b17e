//! Keyword-derived metadata filtering.
//!
//! Maps phrases in the question onto the audience tags, "latest" and
//! "in force" markers the index build stamps on every chunk. The filter
//! narrows the vector search; the retriever falls back to an unfiltered
//! search when a filtered one comes back too thin.

use regrag_core::types::MetadataFilter;

const AUDIENCE_MAP: &[(&str, &str)] = &[
    ("stock broker", "Stock Brokers"),
    ("mutual fund", "Mutual Funds"),
    ("depositor", "Depositories"),
    ("credit rating", "Credit Rating Agencies (CRAs)"),
    ("portfolio manager", "Portfolio Managers"),
    ("research analyst", "Research Analysts"),
    ("investment adviser", "Investment Advisers"),
    ("registrar", "Registrars to an Issue and Share Transfer Agents"),
    ("debenture trustee", "Debenture Trustees (DTs)"),
    ("stock exchange", "Stock Exchanges and Clearing Corporations"),
    ("clearing corporation", "Stock Exchanges and Clearing Corporations"),
    ("invit", "Infrastructure Investment Trusts (InvITs)"),
    ("reit", "Real Estate Investment Trusts (REITs)"),
    ("esg", "ESG Rating Providers (ERPs)"),
    ("social stock", "Social Stock Exchange"),
    ("listing obligation", "Listed Entities"),
    ("issue of capital", "Market Participants"),
];

const LATEST_WORDS: &[&str] = &["latest", "current", "most recent", "newest"];
const ACTIVE_WORDS: &[&str] = &["active", "in force", "in effect"];

/// Derive a metadata filter from the question text. `None` when nothing in
/// the question maps to a known tag.
pub fn build_metadata_filter(question: &str) -> Option<MetadataFilter> {
    let q = question.to_lowercase();

    let mut filter = MetadataFilter::default();
    for (keyword, audience) in AUDIENCE_MAP {
        if q.contains(keyword) {
            filter.audience = Some((*audience).to_string());
            break;
        }
    }
    filter.latest_only = LATEST_WORDS.iter().any(|w| q.contains(w));
    filter.active_only = ACTIVE_WORDS.iter().any(|w| q.contains(w));

    if filter.is_empty() {
        None
    } else {
        Some(filter)
    }
}
