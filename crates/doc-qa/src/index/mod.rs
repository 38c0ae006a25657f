//! Similarity Index Integration
//!
//! Abstraction over the vector store that answers nearest-neighbour queries.

mod memory;

pub use memory::InMemoryIndex;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Fragment, MetadataFilter};

/// Similarity index trait (Strategy pattern)
///
/// Implement this for each vector store backend.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Up to `k` fragments matching `filter`, most similar first
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<Fragment>>;

    /// Index name
    fn name(&self) -> &str;
}
