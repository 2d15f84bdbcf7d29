use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::stream::{self, Stream, StreamExt};
use nw_rag::ChatOutcome;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::error;

use crate::error::ApiError;
use crate::AppState;

/// Inter-token pause while replaying the answer over SSE.
const TOKEN_DELAY: Duration = Duration::from_millis(50);

pub async fn status() -> Json<Value> {
    Json(json!({
        "message": "Newswire chat API is running",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let session_id = state.sessions.create_session().await?;
    Ok(Json(json!({
        "success": true,
        "sessionId": session_id,
        "message": "New session created",
    })))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.sessions.is_valid_session(&session_id).await? {
        return Err(nw_core::Error::Validation("Session not found".to_string()).into());
    }
    let history = state.sessions.get_session_history(&session_id).await?;
    Ok(Json(json!({ "success": true, "history": history })))
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.sessions.is_valid_session(&session_id).await? {
        return Err(nw_core::Error::Validation("Session not found".to_string()).into());
    }

    state.sessions.clear_session_history(&session_id).await?;

    // Verify the clear actually took; a non-empty readback is a hard failure.
    let history = state.sessions.get_session_history(&session_id).await?;
    if !history.is_empty() {
        return Err(
            nw_core::Error::Consistency("Failed to clear session history".to_string()).into(),
        );
    }

    Ok(Json(json!({
        "success": true,
        "message": "Session history cleared",
    })))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let articles = state.snapshot.load()?;
    let listing: Vec<Value> = articles
        .iter()
        .map(|article| {
            let snippet: String = article.content.chars().take(150).collect();
            json!({
                "id": article.id,
                "title": article.title,
                "link": article.link,
                "publishDate": article.publish_date,
                "source": article.source,
                "snippet": format!("{}...", snippet),
            })
        })
        .collect();
    Ok(Json(json!({ "success": true, "articles": listing })))
}

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub message: Option<String>,
}

/// SSE chat endpoint. The exchange runs to completion first; the finished
/// answer is then replayed token by token (`data` events), followed by one
/// `sources` event and one `complete` event. Any failure becomes a single
/// `error` event and the stream still ends cleanly.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChatParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = params.session_id.unwrap_or_default();
    let message = params.message.unwrap_or_default();

    let events = match state.chat.chat(&session_id, &message).await {
        Ok(outcome) => answer_events(&outcome),
        Err(e) => {
            error!("Chat request failed: {}", e);
            vec![(false, error_event(&e))]
        }
    };

    let stream = stream::iter(events).then(|(paced, event)| async move {
        if paced {
            sleep(TOKEN_DELAY).await;
        }
        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn answer_events(outcome: &ChatOutcome) -> Vec<(bool, Event)> {
    let mut events = Vec::new();
    for (i, token) in outcome.answer.split_whitespace().enumerate() {
        events.push((
            i > 0,
            Event::default().data(json!({ "chunk": token }).to_string()),
        ));
    }
    events.push((
        false,
        Event::default()
            .event("sources")
            .data(json!({ "sources": outcome.sources }).to_string()),
    ));
    events.push((
        false,
        Event::default()
            .event("complete")
            .data(json!({ "success": true }).to_string()),
    ));
    events
}

fn error_event(e: &nw_core::Error) -> Event {
    let message = match e {
        nw_core::Error::Validation(message) => message.clone(),
        _ => "Failed to process your message".to_string(),
    };
    Event::default()
        .event("error")
        .data(json!({ "message": message }).to_string())
}
