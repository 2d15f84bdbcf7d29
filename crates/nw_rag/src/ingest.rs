use std::sync::Arc;

use nw_core::{
    Article, EmbeddedArticle, EmbeddingProvider, RecordPayload, Result, VectorRecord, VectorStore,
};
use tracing::info;

/// Upserts go out in fixed-size batches to bound request size.
const UPSERT_BATCH_SIZE: usize = 5;

/// Batch path from raw articles into the vector collection: embed everything,
/// then upsert. Embedding is fail-fast: the first failing article aborts the
/// run with nothing stored. Storage has no rollback: a failure mid-upsert
/// leaves earlier batches committed, and re-running overwrites them by id.
pub struct IngestionPipeline {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl IngestionPipeline {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embeddings, store }
    }

    pub async fn ingest(&self, articles: &[Article]) -> Result<()> {
        if articles.is_empty() {
            info!("No articles to ingest");
            return Ok(());
        }

        info!("Creating embeddings for {} articles", articles.len());
        let embedded = self.embed_articles(articles).await?;

        info!("Storing embeddings in the vector collection");
        self.store_embedded(&embedded).await?;

        info!("Ingested {} articles", embedded.len());
        Ok(())
    }

    /// Embed each article over `title + blank line + content`, the same input
    /// shape queries are embedded against.
    pub async fn embed_articles(&self, articles: &[Article]) -> Result<Vec<EmbeddedArticle>> {
        let mut embedded = Vec::with_capacity(articles.len());
        for article in articles {
            let input = format!("{}\n\n{}", article.title, article.content);
            let embedding = self.embeddings.embed(&input).await?;
            embedded.push(EmbeddedArticle {
                article: article.clone(),
                embedding,
                chunks: Vec::new(),
            });
        }
        Ok(embedded)
    }

    /// Ensure the collection, then upsert one record per article and one per
    /// chunk, batched.
    pub async fn store_embedded(&self, articles: &[EmbeddedArticle]) -> Result<()> {
        self.store.ensure_collection().await?;

        let mut records = Vec::new();
        for embedded in articles {
            let article = &embedded.article;
            records.push(VectorRecord {
                id: article.id.clone(),
                vector: embedded.embedding.clone(),
                payload: RecordPayload::Article {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    content: article.content.clone(),
                    link: article.link.clone(),
                    publish_date: article.publish_date,
                    source: article.source.clone(),
                },
            });

            for chunk in &embedded.chunks {
                records.push(VectorRecord {
                    id: chunk.id.clone(),
                    vector: chunk.embedding.clone(),
                    payload: RecordPayload::Chunk {
                        id: chunk.id.clone(),
                        article_id: chunk.article_id.clone(),
                        text: chunk.text.clone(),
                        title: article.title.clone(),
                        link: article.link.clone(),
                    },
                });
            }
        }

        let total_batches = records.len().div_ceil(UPSERT_BATCH_SIZE);
        for (i, batch) in records.chunks(UPSERT_BATCH_SIZE).enumerate() {
            self.store.upsert(batch).await?;
            info!("Stored batch {} of {}", i + 1, total_batches);
        }

        info!("Stored {} points", records.len());
        Ok(())
    }
}
