//! Retrieved Fragments

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::repr::{py_repr, py_str, py_str_literal};

/// Metadata key that carries a fragment's source category
pub const SOURCE_KEY: &str = "source";

/// One unit of retrieved text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text itself
    pub content: String,

    /// Arbitrary metadata; `source` tags where the text came from
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_meta(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_source(self, source: &str) -> Self {
        self.with_meta(SOURCE_KEY, source)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(serde_json::Value::as_str)
    }
}

/// How a fragment is written into the context block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextFormat {
    /// `page_content='...' metadata={'source': 'pdf'}`, metadata in key order
    #[default]
    Document,

    /// The text alone
    Content,
}

impl Fragment {
    pub fn render(&self, format: ContextFormat) -> String {
        match format {
            ContextFormat::Content => self.content.clone(),
            ContextFormat::Document if self.metadata.is_empty() => {
                format!("page_content={}", py_str_literal(&self.content))
            }
            ContextFormat::Document => {
                let pairs: Vec<String> = self
                    .metadata
                    .iter()
                    .map(|(k, v)| format!("{}: {}", py_str(k), py_repr(v)))
                    .collect();
                format!(
                    "page_content={} metadata={{{}}}",
                    py_str_literal(&self.content),
                    pairs.join(", ")
                )
            }
        }
    }
}

/// Exact-match metadata filter; every pair must match
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter(BTreeMap<String, serde_json::Value>);

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the source category only
    pub fn source(source: &str) -> Self {
        Self::new().with(SOURCE_KEY, source)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn matches(&self, fragment: &Fragment) -> bool {
        self.0
            .iter()
            .all(|(k, v)| fragment.metadata.get(k) == Some(v))
    }
}
