//! HTTP clients for the external embedding and generative models.
//!
//! Speaks the OpenAI-compatible API (Ollama, vLLM, LM Studio, hosted
//! OpenAI all serve it). Each of the four generative call shapes carries
//! its own timeout; classification responses are normalized and parsed
//! into strict verdict types with an explicit parse-failure branch.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

mod client;
pub mod parse;
mod prompts;

pub use client::OpenAiCompatClient;
pub use prompts::PromptSet;
