//! The retrieval-fusion-and-correction pipeline.
//!
//! One user question goes through: multi-query expansion → per-variant
//! vector retrieval (fan-out) → reciprocal rank fusion → relevance grading
//! → parent-context resolution → grounded answer generation → grounding
//! check. Component-local failures degrade per their contracts; only
//! generation failure and total candidate exhaustion reach the caller.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod engine;
pub mod error;
pub mod expand;
pub mod filter;
pub mod fuse;
pub mod grade;
pub mod resolve;
pub mod retrieve;

pub use engine::Pipeline;
pub use error::PipelineError;
