use nw_rag::{ArticleSnapshot, ChatService};
use nw_session::SessionManager;

pub struct AppState {
    pub chat: ChatService,
    pub sessions: SessionManager,
    pub snapshot: ArticleSnapshot,
}
