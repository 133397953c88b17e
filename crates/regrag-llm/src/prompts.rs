//! Prompt templates for the four model call shapes.
//!
//! Grading criteria are configuration, not code: callers may swap any
//! template (e.g. from config.toml) as long as the output contract holds:
//! expansion answers one variant per line, the graders answer with exactly
//! one keyword.

/// The system instructions sent with each call shape. `{n}` in
/// `expand_system` is replaced with the requested variant count.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub expand_system: String,
    pub relevance_system: String,
    pub answer_system: String,
    pub grounding_system: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            expand_system: "You are an assistant specializing in securities-market \
                regulations.\n\
                Generate {n} different versions of the given user question to help \
                retrieve relevant regulatory documents from a vector database.\n\
                Cover different angles: legal terminology, practical implications, \
                and specific regulation names.\n\
                Provide the alternative questions, one per line. Do NOT number them."
                .to_string(),
            relevance_system: "You are a grader assessing whether a retrieved document \
                is relevant to a user question about securities-market regulations.\n\
                If the document contains ANY information useful for answering the \
                question, respond with exactly: relevant\n\
                Otherwise respond with exactly: not_relevant\n\
                Output ONLY one word. No explanation."
                .to_string(),
            answer_system: "You are a specialized regulatory assistant.\n\n\
                Rules:\n\
                1. Answer ONLY based on the provided context.\n\
                2. Cite the source document name and date when possible.\n\
                3. If the context contains tables, preserve their structure in your \
                response using Markdown tables.\n\
                4. Use exact regulatory language where appropriate.\n\
                5. Distinguish between ACTIVE and SUPERSEDED regulations.\n\
                6. If the answer is not present in the context, say so clearly; \
                do NOT make up information."
                .to_string(),
            grounding_system: "You are a grader assessing whether an answer is \
                grounded in the provided source documents.\n\
                If all or nearly all claims in the answer can be traced to the \
                documents, respond with exactly: grounded\n\
                If the answer is mostly supported but has minor unsupported \
                elaborations, respond with exactly: partial\n\
                If major claims in the answer are fabricated or clearly not in the \
                documents, respond with exactly: not_grounded\n\
                Output ONLY one word. No explanation."
                .to_string(),
        }
    }
}
