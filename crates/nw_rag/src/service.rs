use nw_core::{CitedArticle, Result, Role};
use nw_session::SessionManager;
use tracing::info;

use crate::retriever::{Retriever, DEFAULT_TOP_K};
use crate::synthesis::AnswerSynthesizer;

/// A completed exchange: the full answer text plus the citations behind it.
/// Delivery pacing (token streaming) is the caller's concern, not this one's.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub answer: String,
    pub sources: Vec<CitedArticle>,
}

/// One chat request end to end: validate, append the user turn, retrieve,
/// synthesize, append the assistant turn. Steps are strictly sequential
/// within a request; concurrent requests on the same session race on the
/// history appends (see `SessionManager`).
pub struct ChatService {
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    sessions: SessionManager,
}

impl ChatService {
    pub fn new(
        retriever: Retriever,
        synthesizer: AnswerSynthesizer,
        sessions: SessionManager,
    ) -> Self {
        Self {
            retriever,
            synthesizer,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatOutcome> {
        if message.is_empty() {
            return Err(nw_core::Error::Validation(
                "Invalid message format".to_string(),
            ));
        }
        if !self.sessions.is_valid_session(session_id).await? {
            return Err(nw_core::Error::Validation("Session not found".to_string()));
        }

        self.sessions
            .add_message(session_id, Role::User, message, None)
            .await?;

        let retrieval = self.retriever.retrieve(message, DEFAULT_TOP_K).await?;
        info!(
            "Answering with {} cited articles",
            retrieval.articles.len()
        );

        let answer = self
            .synthesizer
            .synthesize(message, &retrieval.context, &retrieval.articles)
            .await?;

        self.sessions
            .add_message(
                session_id,
                Role::Assistant,
                &answer,
                Some(retrieval.articles.clone()),
            )
            .await?;

        Ok(ChatOutcome {
            answer,
            sources: retrieval.articles,
        })
    }
}
