//! # doc-qa
//!
//! Retrieval-augmented prompt building for document question answering.
//!
//! ```text
//! question ──▶ SimilarityIndex (top 10, source = "pdf")
//!                    │
//!                    ▼ fragments, index order
//!          context = concatenated fragments (ContextFormat)
//!                    │
//!                    ▼
//!   "{persona} ... Question: {question}\nContext: {context}\nAnswer:\n"
//! ```
//!
//! The builder never calls a model; the rendered prompt goes to whatever
//! generation call the caller chooses.

pub mod error;
pub mod index;
pub mod model;
pub mod prompt;
mod repr;

pub use error::{QaError, Result};
pub use index::{InMemoryIndex, SimilarityIndex};
pub use model::{ContextFormat, Fragment, MetadataFilter};
pub use prompt::{GroundedPrompt, QaConfig};

/// Default opening sentence of the QA prompt
pub const DEFAULT_PERSONA: &str =
    "You are an assistant for question-answering tasks in a dairy company called Case-Aria s.r.l.";
