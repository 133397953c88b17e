//! Parent-context resolution.
//!
//! Surviving child chunks expand to their owning parent chunks for
//! generation. Parents deduplicate at the position of their first-ranked
//! child. A child whose parent cannot be found is dropped and the rest of
//! the pipeline proceeds. The context budget drops whole lowest-ranked
//! units, never truncating a unit's text mid-way.

use tracing::warn;

use regrag_core::traits::ChunkStore;
use regrag_core::types::{ChunkId, ContextUnit};

pub fn resolve_parents(store: &dyn ChunkStore, child_ids: &[ChunkId]) -> Vec<ContextUnit> {
    let mut units: Vec<ContextUnit> = Vec::new();

    for child_id in child_ids {
        let parent = match store.parent_of(child_id) {
            Ok(Some(parent)) => parent,
            Ok(None) => {
                warn!(%child_id, "no parent chunk found, dropping child from context");
                continue;
            }
            Err(e) => {
                warn!(%child_id, error = %e, "parent lookup failed, dropping child from context");
                continue;
            }
        };

        if let Some(unit) = units.iter_mut().find(|u| u.parent_id == parent.id) {
            unit.child_ids.push(child_id.clone());
        } else {
            units.push(ContextUnit {
                parent_id: parent.id,
                doc_id: parent.doc_id,
                text: parent.text,
                child_ids: vec![child_id.clone()],
                meta: parent.metadata,
            });
        }
    }

    units
}

/// Enforce the assembled-context bound by dropping trailing units. The
/// top-ranked unit always survives, even alone over budget.
pub fn enforce_budget(units: Vec<ContextUnit>, max_chars: usize) -> Vec<ContextUnit> {
    let mut kept = Vec::with_capacity(units.len());
    let mut total = 0usize;
    for unit in units {
        let len = unit.text.chars().count();
        if !kept.is_empty() && total + len > max_chars {
            warn!(
                dropped_parent = %unit.parent_id,
                total,
                "context budget reached, dropping lower-ranked units"
            );
            break;
        }
        total += len;
        kept.push(unit);
    }
    kept
}

/// Format the units as labeled source blocks for the generator.
pub fn format_context_blocks(units: &[ContextUnit]) -> String {
    units
        .iter()
        .map(|unit| {
            let status = unit.meta.status.as_str();
            let section = if unit.meta.section.is_empty() {
                "N/A"
            } else {
                &unit.meta.section
            };
            format!(
                "[Source: {} | Date: {} | Status: {} | Section: {}]\n{}",
                unit.meta.title, unit.meta.date, status, section, unit.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
