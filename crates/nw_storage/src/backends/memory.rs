use std::collections::HashMap;

use async_trait::async_trait;
use nw_core::{RecordPayload, Result, SearchHit, VectorRecord, VectorStore};
use tokio::sync::RwLock;

use crate::VectorBackendConfig;

/// In-process vector store with real cosine ranking. Backs tests and the
/// `--storage memory` mode; nothing survives the process.
pub struct MemoryVectorStore {
    config: VectorBackendConfig,
    records: RwLock<HashMap<String, (Vec<f32>, RecordPayload)>>,
}

impl MemoryVectorStore {
    pub fn new(config: VectorBackendConfig) -> Self {
        Self {
            config,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self::new(VectorBackendConfig {
            dimension,
            ..VectorBackendConfig::default()
        })
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn ensure_collection(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut store = self.records.write().await;
        for record in records {
            if record.vector.len() != self.config.dimension {
                return Err(nw_core::Error::Storage(format!(
                    "Vector for {} has dimension {}, collection expects {}",
                    record.id,
                    record.vector.len(),
                    self.config.dimension
                )));
            }
            store.insert(
                record.id.clone(),
                (record.vector.clone(), record.payload.clone()),
            );
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let store = self.records.read().await;
        let mut hits: Vec<SearchHit> = store
            .values()
            .map(|(stored, payload)| SearchHit {
                payload: payload.clone(),
                score: cosine_similarity(vector, stored),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}
