//! Error Types for Document QA

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QaError>;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Similarity index error: {0}")]
    Index(String),

    #[error("Corpus line {line}: {source}")]
    Corpus {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
