use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news item as fetched from a feed. Identity is `id`; immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub link: String,
    pub publish_date: DateTime<Utc>,
    pub content: String,
    pub source: String,
}

/// An article plus its embedding and any independently embedded sub-passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedArticle {
    pub article: Article,
    pub embedding: Vec<f32>,
    pub chunks: Vec<EmbeddedChunk>,
}

/// A sub-passage of an article, indexed on its own for finer-grained retrieval.
/// `article_id` points back at the owning article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChunk {
    pub id: String,
    pub article_id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// What a vector carries alongside itself in the store. The `type` tag on the
/// wire discriminates article records from chunk records; matching on this
/// enum is exhaustive, so a new payload kind cannot be half-handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordPayload {
    #[serde(rename_all = "camelCase")]
    Article {
        id: String,
        title: String,
        content: String,
        link: String,
        publish_date: DateTime<Utc>,
        source: String,
    },
    #[serde(rename_all = "camelCase")]
    Chunk {
        id: String,
        article_id: String,
        text: String,
        title: String,
        link: String,
    },
}

impl RecordPayload {
    /// Id of the article this payload cites: itself for an article record,
    /// the owning article for a chunk record.
    pub fn owning_article_id(&self) -> &str {
        match self {
            RecordPayload::Article { id, .. } => id,
            RecordPayload::Chunk { article_id, .. } => article_id,
        }
    }
}

/// The unit stored in the vector store. Invariant: `vector.len()` equals the
/// collection's configured dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

/// One search result: payload plus cosine similarity, higher is more relevant.
/// Produced per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub payload: RecordPayload,
    pub score: f32,
}

/// A deduplicated citation entry. The index of an entry in a citation list is
/// the bracket numeral the answer uses to reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedArticle {
    pub id: String,
    pub title: String,
    pub link: String,
    pub source: String,
    pub publish_date: Option<DateTime<Utc>>,
}

/// Context block plus citation list for one query. The n-th entry of
/// `articles` corresponds to the `[n]` marker used in `context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub context: String,
    pub articles: Vec<CitedArticle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a session's history. Appended, never mutated; `sources` is
/// only set on assistant messages. Timestamp is epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<CitedArticle>>,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tag_round_trip() {
        let payload = RecordPayload::Chunk {
            id: "c1".to_string(),
            article_id: "a1".to_string(),
            text: "some passage".to_string(),
            title: "Test".to_string(),
            link: "http://test.com".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "chunk");
        assert_eq!(json["articleId"], "a1");

        let back: RecordPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.owning_article_id(), "a1");
    }

    #[test]
    fn test_message_sources_omitted_when_absent() {
        let message = Message {
            role: Role::User,
            content: "hello".to_string(),
            sources: None,
            timestamp: 0,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("sources").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_article_wire_names() {
        let article = Article {
            id: "a1".to_string(),
            title: "Test".to_string(),
            link: "http://test.com".to_string(),
            publish_date: Utc::now(),
            content: "body".to_string(),
            source: "test".to_string(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("publishDate").is_some());
    }
}
