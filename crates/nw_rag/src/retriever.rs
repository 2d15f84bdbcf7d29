use std::collections::HashSet;
use std::sync::Arc;

use nw_core::{
    CitedArticle, EmbeddingProvider, RecordPayload, Result, RetrievalResult, SearchHit,
    VectorStore,
};
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 5;

/// Query-time half of the pipeline: embed the query with the same provider
/// ingestion used (the two must share one embedding space), take the store's
/// top-k ordering as-is, and turn the hits into a numbered context block plus
/// a deduplicated citation list.
pub struct Retriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embeddings, store }
    }

    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalResult> {
        if top_k == 0 {
            return Ok(RetrievalResult {
                context: String::new(),
                articles: Vec::new(),
            });
        }

        let query_embedding = self.embeddings.embed(query).await?;
        let hits = self.store.search(&query_embedding, top_k).await?;
        debug!("Retrieved {} hits for query", hits.len());

        Ok(RetrievalResult {
            context: format_context(&hits),
            articles: extract_unique_articles(&hits),
        })
    }
}

/// One numbered line per hit, in store order. The numbers here are the same
/// bracket numerals the synthesizer's citation legend uses.
pub fn format_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(index, hit)| match &hit.payload {
            RecordPayload::Article { title, content, .. } => {
                format!("[{}] Article: \"{}\"\n{}\n", index + 1, title, content)
            }
            RecordPayload::Chunk { title, text, .. } => {
                format!("[{}] From article \"{}\":\n{}\n", index + 1, title, text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Citation list: one entry per owning article, first hit wins, hit order
/// preserved. A hit without both a title and a link cannot be cited and is
/// skipped.
pub fn extract_unique_articles(hits: &[SearchHit]) -> Vec<CitedArticle> {
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for hit in hits {
        let (article_id, title, link, source, publish_date) = match &hit.payload {
            RecordPayload::Article {
                id,
                title,
                link,
                source,
                publish_date,
                ..
            } => (id, title, link, Some(source.clone()), Some(*publish_date)),
            RecordPayload::Chunk {
                article_id,
                title,
                link,
                ..
            } => (article_id, title, link, None, None),
        };

        if title.is_empty() || link.is_empty() {
            continue;
        }
        if !seen.insert(article_id.clone()) {
            continue;
        }

        articles.push(CitedArticle {
            id: article_id.clone(),
            title: title.clone(),
            link: link.clone(),
            source: source
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown Source".to_string()),
            publish_date,
        });
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nw_inference::MockEmbeddings;
    use nw_storage::backends::memory::MemoryVectorStore;
    use nw_core::VectorRecord;

    fn article_hit(id: &str, title: &str, link: &str, score: f32) -> SearchHit {
        SearchHit {
            payload: RecordPayload::Article {
                id: id.to_string(),
                title: title.to_string(),
                content: format!("content of {}", id),
                link: link.to_string(),
                publish_date: Utc::now(),
                source: "Test Wire".to_string(),
            },
            score,
        }
    }

    fn chunk_hit(id: &str, article_id: &str, title: &str, score: f32) -> SearchHit {
        SearchHit {
            payload: RecordPayload::Chunk {
                id: id.to_string(),
                article_id: article_id.to_string(),
                text: format!("passage {}", id),
                title: title.to_string(),
                link: format!("http://news.test/{}", article_id),
            },
            score,
        }
    }

    #[test]
    fn test_context_numbering_follows_hit_order() {
        let hits = vec![
            article_hit("a1", "First", "http://news.test/a1", 0.9),
            chunk_hit("c1", "a2", "Second", 0.8),
        ];
        let context = format_context(&hits);
        assert!(context.contains("[1] Article: \"First\""));
        assert!(context.contains("[2] From article \"Second\":"));
        assert!(context.contains("passage c1"));
    }

    #[test]
    fn test_chunks_dedupe_to_one_citation_per_article() {
        let hits = vec![
            chunk_hit("c1", "a1", "Shared", 0.9),
            chunk_hit("c2", "a1", "Shared", 0.8),
            article_hit("a1", "Shared", "http://news.test/a1", 0.7),
        ];
        let articles = extract_unique_articles(&hits);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "a1");
        // First-seen entry was a chunk, so there is no source to carry.
        assert_eq!(articles[0].source, "Unknown Source");
    }

    #[test]
    fn test_uncitable_hits_are_dropped() {
        let hits = vec![
            article_hit("a1", "", "http://news.test/a1", 0.9),
            article_hit("a2", "Titled", "", 0.8),
            article_hit("a3", "Cited", "http://news.test/a3", 0.7),
        ];
        let articles = extract_unique_articles(&hits);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "a3");
    }

    #[tokio::test]
    async fn test_top_k_zero_returns_empty_without_searching() {
        let retriever = Retriever::new(
            Arc::new(MockEmbeddings::new(16)),
            Arc::new(MemoryVectorStore::with_dimension(16)),
        );
        let result = retriever.retrieve("anything", 0).await.unwrap();
        assert!(result.context.is_empty());
        assert!(result.articles.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_nearest_article_comes_back_first() {
        let embeddings = Arc::new(MockEmbeddings::new(64));
        let store = Arc::new(MemoryVectorStore::with_dimension(64));
        let retriever = Retriever::new(embeddings.clone(), store.clone());

        for (id, title, content) in [
            ("a1", "Elections", "The national elections were held yesterday."),
            ("a2", "Football", "The cup final ended in a draw."),
        ] {
            let vector = embeddings
                .embed(&format!("{}\n\n{}", title, content))
                .await
                .unwrap();
            store
                .upsert(&[VectorRecord {
                    id: id.to_string(),
                    vector,
                    payload: RecordPayload::Article {
                        id: id.to_string(),
                        title: title.to_string(),
                        content: content.to_string(),
                        link: format!("http://news.test/{}", id),
                        publish_date: Utc::now(),
                        source: "Test Wire".to_string(),
                    },
                }])
                .await
                .unwrap();
        }

        let result = retriever
            .retrieve("Elections\n\nThe national elections were held yesterday.", 2)
            .await
            .unwrap();
        assert_eq!(result.articles[0].id, "a1");
        assert!(result.context.starts_with("[1] Article: \"Elections\""));
    }
}
