//! Retrieved document and citation types.
//!
//! A `RetrievedDocument` is produced fresh per query by the search
//! provider and never cached or mutated. Scores are on the provider's
//! own scale.

use serde::{Deserialize, Serialize};

/// Metadata extracted alongside a retrieved document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Storage path or other locator for the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Entities extracted by the indexer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

/// One ranked document returned by the search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Index document id
    pub doc_id: String,

    /// The document text (may be empty for image-only documents)
    pub text: String,

    /// Extracted metadata
    #[serde(default)]
    pub meta: DocumentMeta,

    /// Relevance score, provider-defined scale
    pub score: f32,
}

impl RetrievedDocument {
    /// The locator shown to users: the source path when present,
    /// otherwise the document id.
    pub fn source_or_id(&self) -> &str {
        self.meta.source.as_deref().unwrap_or(&self.doc_id)
    }
}

/// A citation entry returned to the API caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: String,
    pub source: Option<String>,
    pub score: f32,
}

impl From<&RetrievedDocument> for Citation {
    fn from(doc: &RetrievedDocument) -> Self {
        Self {
            doc_id: doc.doc_id.clone(),
            source: doc.meta.source.clone(),
            score: doc.score,
        }
    }
}
