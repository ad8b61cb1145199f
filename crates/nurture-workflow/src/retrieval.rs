//! Brochure retrieval trait and the Chroma-style HTTP client.
//!
//! The semantic store is a shared read path: the pipeline only queries it,
//! never mutates it. Indexing new brochures is a separate ingestion path
//! outside this workspace.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use nurture_core::config::RetrievalConfig;

use crate::error::WorkflowError;

/// External semantic search over indexed brochure chunks.
#[async_trait]
pub trait BrochureRetrieval: Send + Sync {
    /// Return the single most relevant passage for the query, or an empty
    /// string when nothing is indexed or nothing matches.
    async fn query(&self, text: &str) -> Result<String, WorkflowError>;
}

/// Client for a Chroma-style REST retrieval endpoint.
///
/// Resolves the collection id once (get-or-create by name) and caches it
/// for the lifetime of the client.
pub struct ChromaRetrieval {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
}

impl ChromaRetrieval {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            collection_id: OnceCell::new(),
        }
    }

    async fn resolve_collection_id(&self) -> Result<String, WorkflowError> {
        let url = format!("{}/api/v1/collections", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": self.collection, "get_or_create": true }))
            .send()
            .await
            .map_err(|e| WorkflowError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkflowError::Retrieval(format!(
                "collection lookup returned {}",
                response.status()
            )));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| WorkflowError::Retrieval(format!("malformed response: {}", e)))?;

        parsed["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| WorkflowError::Retrieval("collection response missing id".to_string()))
    }
}

#[async_trait]
impl BrochureRetrieval for ChromaRetrieval {
    async fn query(&self, text: &str) -> Result<String, WorkflowError> {
        let id = self
            .collection_id
            .get_or_try_init(|| self.resolve_collection_id())
            .await?;

        let url = format!("{}/api/v1/collections/{}/query", self.base_url, id);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "query_texts": [text], "n_results": 1 }))
            .send()
            .await
            .map_err(|e| WorkflowError::Retrieval(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WorkflowError::Retrieval(format!(
                "query returned {}",
                response.status()
            )));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| WorkflowError::Retrieval(format!("malformed response: {}", e)))?;

        // documents is a list-of-lists, one inner list per query text.
        // An empty store yields no documents; that is a miss, not an error.
        Ok(parsed["documents"][0][0]
            .as_str()
            .unwrap_or("")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let retrieval = ChromaRetrieval::from_config(&RetrievalConfig {
            base_url: "http://localhost:8000/".to_string(),
            collection: "brochures".to_string(),
        });
        assert_eq!(retrieval.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_miss_extraction_from_empty_documents() {
        // Shape returned by the service when nothing is indexed.
        let parsed: Value = serde_json::from_str(r#"{"documents": [[]]}"#).unwrap();
        let passage = parsed["documents"][0][0].as_str().unwrap_or("");
        assert_eq!(passage, "");
    }

    #[test]
    fn test_hit_extraction() {
        let parsed: Value =
            serde_json::from_str(r#"{"documents": [["lake-facing balconies"]]}"#).unwrap();
        let passage = parsed["documents"][0][0].as_str().unwrap_or("");
        assert_eq!(passage, "lake-facing balconies");
    }
}
