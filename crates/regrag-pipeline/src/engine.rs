//! Pipeline orchestrator.
//!
//! Linear stage sequence: Expand → Retrieve → Fuse → Grade → Resolve →
//! Generate → Check → Done. No stage is re-entered. The only unrecoverable
//! exits are total candidate exhaustion and generation failure; every
//! other stage degrades per its own contract.

use std::sync::Arc;

use tracing::{debug, info, warn};

use regrag_core::config::RetrievalConfig;
use regrag_core::traits::{ChunkStore, GenerativeModel, VectorIndex};
use regrag_core::types::{
    Confidence, ContextUnit, GradedResult, Grounding, PipelineResult, Relevance, SourceRef,
};

use crate::error::PipelineError;
use crate::grade::char_prefix;
use crate::{expand, filter, fuse, grade, resolve, retrieve};

const NOT_GROUNDED_NOTE: &str = "\n\nNote: parts of this answer may not be directly supported \
by the source documents. Please verify against the original circulars.";

/// One pipeline instance serves any number of concurrent questions; all
/// per-question state is local to [`Pipeline::answer`].
pub struct Pipeline {
    store: Arc<dyn ChunkStore>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn GenerativeModel>,
    cfg: RetrievalConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ChunkStore>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn GenerativeModel>,
        cfg: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            index,
            model,
            cfg,
        }
    }

    /// Answer one question. Always returns an answer with honestly
    /// reported confidence, or an explicit error; never a fabricated
    /// answer and never a silent empty one.
    pub async fn answer(&self, question: &str) -> Result<PipelineResult, PipelineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        info!(%question, "pipeline invocation started");

        // Expand
        let variants =
            expand::expand_question(self.model.as_ref(), question, self.cfg.variant_count).await;
        let queries_used: Vec<String> = variants.iter().map(|v| v.text.clone()).collect();

        // Retrieve (concurrent fan-out per variant)
        let meta_filter = filter::build_metadata_filter(question);
        let lists = retrieve::retrieve_candidates(
            self.index.as_ref(),
            &variants,
            self.cfg.per_query_k,
            meta_filter.as_ref(),
        )
        .await;

        // Fuse
        let fused = fuse::reciprocal_rank_fusion(&lists, self.cfg.rrf_k, self.cfg.fused_top_m);
        if fused.is_empty() {
            warn!("fusion produced no candidates");
            return Err(PipelineError::NoCandidates);
        }
        let num_retrieved = fused.len();
        debug!(num_retrieved, "fused candidate set");

        // Grade
        let mut graded = grade::grade_candidates(
            self.model.as_ref(),
            self.store.as_ref(),
            question,
            &fused,
            self.cfg.grade_snippet_chars,
        )
        .await;
        let num_relevant = graded.len();

        // Overstrict grading: carry the top fused candidate forward so the
        // caller still gets an answer, flagged for low confidence.
        let forced = graded.is_empty();
        if forced {
            warn!("all candidates graded irrelevant, forcing top fused candidate");
            graded = vec![GradedResult {
                fused: fused[0].clone(),
                verdict: Relevance::Irrelevant,
                forced: true,
            }];
        }

        // Resolve
        let child_ids: Vec<_> = graded.iter().map(|g| g.fused.chunk_id.clone()).collect();
        let units = resolve::resolve_parents(self.store.as_ref(), &child_ids);
        let units = resolve::enforce_budget(units, self.cfg.max_context_chars);
        if units.is_empty() {
            warn!("no parent context could be resolved");
            return Err(PipelineError::NoCandidates);
        }
        let context_blocks = resolve::format_context_blocks(&units);

        // Generate (the one fatal model call)
        let mut answer = self
            .model
            .generate(question, &context_blocks)
            .await
            .map_err(PipelineError::GenerationFailed)?;

        // Check
        let grounding_context = char_prefix(&context_blocks, self.cfg.grounding_context_chars);
        let mut confidence = match self.model.grade_grounding(&answer, grounding_context).await {
            Ok(Grounding::Grounded) => Confidence::High,
            Ok(Grounding::Partial) => Confidence::Medium,
            Ok(Grounding::NotGrounded) => {
                answer.push_str(NOT_GROUNDED_NOTE);
                Confidence::Low
            }
            Err(e) => {
                // Conservative default, never silently high.
                warn!(error = %e, "grounding check failed, defaulting confidence to low");
                Confidence::Low
            }
        };
        if forced {
            confidence = Confidence::Low;
        }

        let sources = assemble_sources(&units);
        info!(
            confidence = confidence.as_str(),
            num_retrieved, num_relevant, "pipeline invocation finished"
        );

        Ok(PipelineResult {
            answer,
            sources,
            confidence,
            queries_used,
            num_retrieved,
            num_relevant,
        })
    }
}

/// One source entry per document, in context order, first occurrence wins.
/// Keyed on the document id; two documents may share a title.
fn assemble_sources(units: &[ContextUnit]) -> Vec<SourceRef> {
    let mut sources: Vec<SourceRef> = Vec::new();
    for unit in units {
        if let Some(existing) = sources.iter_mut().find(|s| s.doc_id == unit.doc_id) {
            existing.chunk_ids.extend(unit.child_ids.iter().cloned());
        } else {
            sources.push(SourceRef {
                doc_id: unit.doc_id.clone(),
                title: unit.meta.title.clone(),
                date: unit.meta.date.clone(),
                status: unit.meta.status,
                chunk_ids: unit.child_ids.clone(),
            });
        }
    }
    sources
}
