//! Grounded Prompt Builder
//!
//! One retrieval call, one rendered prompt. Generation happens elsewhere.

use std::sync::Arc;

use crate::error::Result;
use crate::index::SimilarityIndex;
use crate::model::{ContextFormat, Fragment, MetadataFilter};
use crate::DEFAULT_PERSONA;

/// Builder configuration
#[derive(Clone, Debug)]
pub struct QaConfig {
    /// Opening sentence of the prompt
    pub persona: String,

    /// Fragments requested per question
    pub top_k: usize,

    /// Source category fragments must carry
    pub source: String,

    /// How each fragment is written into the context
    pub context_format: ContextFormat,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.into(),
            top_k: 10,
            source: "pdf".into(),
            context_format: ContextFormat::Document,
        }
    }
}

/// Builds question-answering prompts grounded in retrieved fragments
pub struct GroundedPrompt {
    index: Arc<dyn SimilarityIndex>,
    config: QaConfig,
}

impl GroundedPrompt {
    pub fn new(index: Arc<dyn SimilarityIndex>) -> Self {
        Self::with_config(index, QaConfig::default())
    }

    pub fn with_config(index: Arc<dyn SimilarityIndex>, config: QaConfig) -> Self {
        Self { index, config }
    }

    pub const fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Fragments for the question, in the order the index returned them
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Fragment>> {
        let filter = MetadataFilter::source(&self.config.source);
        let fragments = self
            .index
            .similarity_search(question, self.config.top_k, &filter)
            .await?;

        tracing::debug!(
            index = self.index.name(),
            requested = self.config.top_k,
            returned = fragments.len(),
            "Retrieved fragments"
        );
        Ok(fragments)
    }

    /// Retrieve, then render. Retrieval errors are returned to the caller.
    pub async fn build_prompt(&self, question: &str) -> Result<String> {
        let fragments = self.retrieve(question).await?;
        Ok(self.render(question, &fragments))
    }

    /// Render the prompt for already retrieved fragments
    pub fn render(&self, question: &str, fragments: &[Fragment]) -> String {
        let context: String = fragments
            .iter()
            .map(|f| f.render(self.config.context_format))
            .collect();

        format!(
            "{} Use the following pieces of retrieved context to answer the question. \
             Keep the answer concise. Question: {question}\nContext: {context}\nAnswer:\n",
            self.config.persona
        )
    }
}
