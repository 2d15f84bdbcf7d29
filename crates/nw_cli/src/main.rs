use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use nw_core::{CompletionModel, EmbeddingProvider, Result, VectorStore};
use nw_inference::{GeminiCompletion, OpenAiEmbeddings};
use nw_rag::{AnswerSynthesizer, ArticleSnapshot, ChatService, IngestionPipeline, Retriever};
use nw_session::SessionManager;
use nw_storage::{create_vector_store, VectorBackendConfig};
use nw_web::{create_app, AppState};
use tracing::info;

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Vector storage backend. Available: memory, qdrant
    #[arg(long, default_value = "qdrant")]
    storage: String,
    /// Session storage backend. Available: memory, redis
    #[arg(long, default_value = "redis")]
    sessions: String,
    /// Article snapshot served by the articles endpoint
    #[arg(long, default_value = "data/articles.json")]
    articles_file: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the chat API server
    Serve {
        /// Listening port; falls back to PORT, then 3000
        #[arg(long)]
        port: Option<u16>,
    },
    /// Embed a JSON file of articles and store them in the vector collection
    Ingest {
        /// Flat JSON array of articles
        file: PathBuf,
    },
    /// Delete sessions older than the age threshold
    CleanupSessions {
        #[arg(long, default_value_t = 60)]
        max_age_minutes: i64,
    },
}

fn qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://localhost:6334".to_string())
}

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

async fn vector_store(cli: &Cli) -> Result<Arc<dyn VectorStore>> {
    let config = VectorBackendConfig {
        url: qdrant_url(),
        ..VectorBackendConfig::default()
    };
    create_vector_store(&cli.storage, config).await
}

async fn session_manager(cli: &Cli) -> Result<SessionManager> {
    let store = nw_session::create_conversation_store(&cli.sessions, &redis_url()).await?;
    Ok(SessionManager::new(store))
}

async fn serve(cli: &Cli, port: Option<u16>) -> Result<()> {
    let store = vector_store(cli).await?;
    store.ensure_collection().await?;
    info!("Vector collection initialized successfully");

    let sessions = session_manager(cli).await?;

    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddings::from_env());
    let completion: Arc<dyn CompletionModel> = Arc::new(GeminiCompletion::from_env());

    let chat = ChatService::new(
        Retriever::new(embeddings, store),
        AnswerSynthesizer::new(completion),
        sessions.clone(),
    );

    let app = create_app(AppState {
        chat,
        sessions,
        snapshot: ArticleSnapshot::new(cli.articles_file.clone()),
    });

    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ingest(cli: &Cli, file: &Path) -> Result<()> {
    info!("Starting data ingestion pipeline");
    let articles = ArticleSnapshot::new(file).load()?;
    if articles.is_empty() {
        info!("No articles found in {}. Aborting ingestion.", file.display());
        return Ok(());
    }
    info!("Loaded {} articles from {}", articles.len(), file.display());

    let store = vector_store(cli).await?;
    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddings::from_env());
    IngestionPipeline::new(embeddings, store)
        .ingest(&articles)
        .await?;

    ArticleSnapshot::new(cli.articles_file.clone()).save(&articles)?;
    info!("Data ingestion completed successfully");
    Ok(())
}

async fn cleanup_sessions(cli: &Cli, max_age_minutes: i64) -> Result<()> {
    let sessions = session_manager(cli).await?;
    let cleaned = sessions.cleanup_old_sessions(max_age_minutes).await?;
    info!("Removed {} expired sessions", cleaned);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { port } => serve(&cli, *port).await,
        Commands::Ingest { file } => ingest(&cli, file).await,
        Commands::CleanupSessions { max_age_minutes } => {
            cleanup_sessions(&cli, *max_age_minutes).await
        }
    }
}
