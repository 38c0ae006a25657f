//! In-Memory Index
//!
//! Keyword-overlap index for demos and tests. Scores a fragment by how many
//! distinct query terms it contains.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use async_trait::async_trait;

use super::SimilarityIndex;
use crate::error::{QaError, Result};
use crate::model::{Fragment, MetadataFilter};

/// Fragments held in insertion order
#[derive(Clone, Debug, Default)]
pub struct InMemoryIndex {
    fragments: Vec<Fragment>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Load a JSON Lines corpus, one `Fragment` per non-blank line
    pub fn from_jsonl(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut fragments = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fragment = serde_json::from_str(&line)
                .map_err(|source| QaError::Corpus { line: i + 1, source })?;
            fragments.push(fragment);
        }

        tracing::debug!(fragments = fragments.len(), "Corpus loaded");
        Ok(Self { fragments })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl SimilarityIndex for InMemoryIndex {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<Fragment>> {
        let query_terms = terms(query);

        let mut scored: Vec<(usize, &Fragment)> = self
            .fragments
            .iter()
            .filter(|f| filter.matches(f))
            .map(|f| (terms(&f.content).intersection(&query_terms).count(), f))
            .collect();

        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored.into_iter().take(k).map(|(_, f)| f.clone()).collect())
    }

    fn name(&self) -> &str {
        "InMemoryIndex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InMemoryIndex {
        InMemoryIndex::from_fragments(vec![
            Fragment::new("Opening hours are 8 to 17.").with_source("web"),
            Fragment::new("Mozzarella is stretched curd cheese.").with_source("pdf"),
            Fragment::new("Ricotta is made from whey left over from cheese.").with_source("pdf"),
            Fragment::new("Delivery trucks leave at dawn.").with_source("pdf"),
        ])
    }

    #[tokio::test]
    async fn test_ranks_by_overlap_and_filters() {
        let hits = index()
            .similarity_search("how is ricotta cheese made", 10, &MetadataFilter::source("pdf"))
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert!(hits[0].content.starts_with("Ricotta"));
        assert!(hits[1].content.starts_with("Mozzarella"));
        assert!(hits.iter().all(|f| f.source() == Some("pdf")));
    }

    #[tokio::test]
    async fn test_k_limits_results() {
        let hits = index()
            .similarity_search("cheese", 1, &MetadataFilter::new())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_from_reader() {
        let corpus = concat!(
            r#"{"content": "a", "metadata": {"source": "pdf"}}"#,
            "\n\n",
            r#"{"content": "b"}"#,
            "\n"
        );
        let index = InMemoryIndex::from_reader(corpus.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);

        let corpus = concat!(r#"{"content": "a"}"#, "\nnot json\n");
        let err = InMemoryIndex::from_reader(corpus.as_bytes()).unwrap_err();
        assert!(matches!(err, QaError::Corpus { line: 2, .. }));
    }
}
