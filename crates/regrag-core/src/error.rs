use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index operation failed: {0}")]
    Index(String),

    #[error("Corrupt chunk store: {0}")]
    CorruptStore(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single external-model call. The owning component decides
/// what to do with it: expansion and grading degrade, generation is fatal.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("model request failed: {0}")]
    Request(String),

    #[error("model returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unparseable model response: {0}")]
    Parse(String),
}

impl ModelError {
    /// True for responses that arrived but could not be classified, the
    /// one case worth a single retry before falling back.
    pub fn is_parse(&self) -> bool {
        matches!(self, ModelError::Parse(_))
    }
}
