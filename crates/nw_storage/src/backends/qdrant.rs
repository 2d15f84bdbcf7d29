use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use nw_core::{RecordPayload, Result, SearchHit, VectorRecord, VectorStore};
use qdrant_client::{
    qdrant::{
        vectors_config::Config, CreateCollection, Distance, PointStruct, SearchPoints,
        UpsertPoints, VectorParams, Vectors, VectorsConfig, WithPayloadSelector,
    },
    Qdrant,
};
use tracing::info;

use crate::VectorBackendConfig;

/// Qdrant-backed vector store. One gRPC client shared across requests; the
/// full payload round-trips through a `doc` JSON field, with the discriminant
/// and title duplicated as scalar fields for server-side filtering.
pub struct QdrantVectorStore {
    client: Arc<Qdrant>,
    config: VectorBackendConfig,
}

impl QdrantVectorStore {
    pub async fn new(config: VectorBackendConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .build()
            .map_err(|e| nw_core::Error::External(e.into()))?;
        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| nw_core::Error::External(e.into()))?;

        if collections
            .collections
            .iter()
            .any(|c| c.name == self.config.collection)
        {
            return Ok(());
        }

        info!("Creating collection {}", self.config.collection);
        let vector_config = VectorsConfig {
            config: Some(Config::Params(VectorParams {
                size: self.config.dimension as u64,
                distance: Distance::Cosine.into(),
                ..Default::default()
            })),
        };

        self.client
            .create_collection(CreateCollection {
                collection_name: self.config.collection.clone(),
                vectors_config: Some(vector_config),
                ..Default::default()
            })
            .await
            .map_err(|e| nw_core::Error::External(e.into()))?;

        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            let doc_str = serde_json::to_string(&record.payload)?;

            let discriminant = match &record.payload {
                RecordPayload::Article { .. } => "article",
                RecordPayload::Chunk { .. } => "chunk",
            };
            let title = match &record.payload {
                RecordPayload::Article { title, .. } => title.clone(),
                RecordPayload::Chunk { title, .. } => title.clone(),
            };

            let mut payload = HashMap::new();
            payload.insert("type".to_string(), discriminant.to_string().into());
            payload.insert("title".to_string(), title.into());
            payload.insert("doc".to_string(), doc_str.into());

            points.push(PointStruct {
                id: Some(record.id.clone().into()),
                vectors: Some(Vectors::from(record.vector.clone())),
                payload,
            });
        }

        self.client
            .upsert_points(UpsertPoints {
                collection_name: self.config.collection.clone(),
                points,
                ..Default::default()
            })
            .await
            .map_err(|e| nw_core::Error::External(e.into()))?;

        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let request = SearchPoints {
            collection_name: self.config.collection.clone(),
            vector: vector.to_vec(),
            limit: limit as u64,
            with_payload: Some(WithPayloadSelector::from(true)),
            ..Default::default()
        };

        let results = self
            .client
            .search_points(request)
            .await
            .map_err(|e| nw_core::Error::External(e.into()))?;

        let mut hits = Vec::with_capacity(results.result.len());
        for point in results.result {
            let doc_str = point
                .payload
                .get("doc")
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .ok_or_else(|| {
                    nw_core::Error::Upstream("Search hit is missing its doc payload".to_string())
                })?;
            let payload: RecordPayload = serde_json::from_str(&doc_str)?;
            hits.push(SearchHit {
                payload,
                score: point.score,
            });
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    // Needs a running Qdrant; exercised in environments that provide one.
    #[tokio::test]
    #[ignore]
    async fn test_qdrant_round_trip() {
        let config = VectorBackendConfig {
            url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6334".to_string()),
            collection: format!("test_{}", Uuid::new_v4().simple()),
            dimension: 4,
        };
        let store = QdrantVectorStore::new(config).await.unwrap();
        store.ensure_collection().await.unwrap();

        let id = Uuid::new_v4().to_string();
        store
            .upsert(&[VectorRecord {
                id: id.clone(),
                vector: vec![1.0, 0.0, 0.0, 0.0],
                payload: RecordPayload::Article {
                    id: id.clone(),
                    title: "Test Article".to_string(),
                    content: "content".to_string(),
                    link: "http://test.com".to_string(),
                    publish_date: Utc::now(),
                    source: "test".to_string(),
                },
            }])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload.owning_article_id(), id);
    }
}
