//! Azure AI Search provider.
//!
//! Queries the index's REST search endpoint and maps hits into the
//! unified [`RetrievedDocument`] shape. Uses semantic ranking when a
//! semantic configuration name is set, plain keyword search otherwise.
//!
//! Index schemas vary: text may live in `merged_content`, `content`, or
//! `imageCaption` (string or string array), and the source locator in
//! `metadata_storage_path` or `source`. The mapper tolerates all of
//! these, the same way the indexer-fed schema does.

use async_trait::async_trait;
use sagealpha_core::document::{DocumentMeta, RetrievedDocument};
use sagealpha_core::error::ProviderError;
use sagealpha_core::provider::SearchProvider;
use serde_json::Value;
use tracing::{debug, warn};

const API_VERSION: &str = "2023-11-01";

/// Ranked-document retrieval against an Azure AI Search index.
pub struct AzureSearchProvider {
    endpoint: String,
    api_key: String,
    index: String,
    semantic_config: Option<String>,
    client: reqwest::Client,
}

impl AzureSearchProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        index: impl Into<String>,
        semantic_config: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            index: index.into(),
            semantic_config,
            client,
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, API_VERSION
        )
    }

    fn request_body(&self, query: &str, top_k: usize) -> Value {
        let mut body = serde_json::json!({
            "search": query,
            "top": top_k,
        });

        if let Some(semantic) = &self.semantic_config {
            body["queryType"] = Value::from("semantic");
            body["semanticConfiguration"] = Value::from(semantic.as_str());
        }

        body
    }
}

#[async_trait]
impl SearchProvider for AzureSearchProvider {
    fn name(&self) -> &str {
        "azure_search"
    }

    async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        debug!(index = %self.index, query = %query, top_k, "Searching index");

        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(query, top_k))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid search API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Search service returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let docs = parse_documents(&body);
        debug!(count = docs.len(), "Retrieved documents");
        Ok(docs)
    }
}

/// Map a search response body into the unified document shape.
fn parse_documents(body: &Value) -> Vec<RetrievedDocument> {
    let Some(hits) = body["value"].as_array() else {
        return Vec::new();
    };

    hits.iter().map(parse_document).collect()
}

fn parse_document(hit: &Value) -> RetrievedDocument {
    let mut content_parts = Vec::new();
    for field in ["merged_content", "content", "imageCaption"] {
        if let Some(text) = field_as_text(&hit[field]) {
            content_parts.push(text);
        }
    }

    let source = hit["metadata_storage_path"]
        .as_str()
        .or_else(|| hit["source"].as_str())
        .map(String::from);

    let doc_id = hit["id"]
        .as_str()
        .or_else(|| hit["metadata_storage_path"].as_str())
        .unwrap_or_default()
        .to_string();

    RetrievedDocument {
        doc_id,
        text: content_parts.join("\n"),
        meta: DocumentMeta {
            source,
            people: string_array(&hit["people"]),
            organizations: string_array(&hit["organizations"]),
            locations: string_array(&hit["locations"]),
        },
        score: hit["@search.score"].as_f64().unwrap_or(0.0) as f32,
    }
}

/// Flatten a field that may be a string or an array of strings.
fn field_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

fn string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
