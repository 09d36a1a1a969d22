//! HTTP server
//!
//! JSON CRUD under `/api/topics`, form-posted verify/consolidate actions that
//! answer with HTML or a .docx attachment, and session cookie management.

mod error;
mod handlers;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::editor::{Editor, EditorModels};
use crate::error::{RedatorError, Result};
use crate::format::PageRenderer;
use crate::llm::CompletionProvider;
use crate::session::SessionAuthority;
use crate::storage::{Storage, TopicStore};
use crate::workspace::Workspace;

pub use handlers::{NewTask, NewTopic, SessionForm, TaskUpdate, TopicDetail, TopicForm};
pub use session::{session_cookie, session_token};

/// Shared collaborators, constructed once and injected into every handler
pub struct ServerState<S: Storage> {
    pub workspace: Arc<Workspace<S>>,
    pub editor: Arc<Editor<S>>,
    pub sessions: Arc<dyn SessionAuthority>,
    pub pages: Arc<PageRenderer>,
    pub config: Arc<Config>,
}

impl<S: Storage> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            workspace: Arc::clone(&self.workspace),
            editor: Arc::clone(&self.editor),
            sessions: Arc::clone(&self.sessions),
            pages: Arc::clone(&self.pages),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Storage> ServerState<S> {
    pub fn new(
        storage: Arc<S>,
        provider: Arc<dyn CompletionProvider>,
        sessions: Arc<dyn SessionAuthority>,
        config: Config,
    ) -> Result<Self> {
        let store = TopicStore::new(storage);
        let models = EditorModels {
            verify: config.llm.verify_model.clone(),
            consolidate: config.llm.consolidate_model.clone(),
        };
        Ok(Self {
            workspace: Arc::new(Workspace::new(store.clone())),
            editor: Arc::new(Editor::new(store, provider, models)?),
            sessions,
            pages: Arc::new(PageRenderer::new()?),
            config: Arc::new(config),
        })
    }
}

pub fn router<S: Storage + 'static>(state: ServerState<S>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/auth/session", post(handlers::create_session::<S>))
        .route("/auth/signout", post(handlers::sign_out::<S>))
        .route(
            "/api/topics",
            get(handlers::list_topics::<S>).post(handlers::create_topic::<S>),
        )
        .route(
            "/api/topics/:id",
            get(handlers::get_topic::<S>).delete(handlers::delete_topic::<S>),
        )
        .route("/api/topics/:id/structure", put(handlers::update_structure::<S>))
        .route("/api/topics/:id/tasks", post(handlers::create_task::<S>))
        .route(
            "/api/topics/:id/tasks/:task_id",
            get(handlers::get_task::<S>)
                .put(handlers::update_task::<S>)
                .delete(handlers::delete_task::<S>),
        )
        .route("/api/verify", post(handlers::verify::<S>))
        .route("/api/consolidate", post(handlers::consolidate::<S>))
        .route("/api/consolidate/docx", post(handlers::consolidate_docx::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve<S: Storage + 'static>(state: ServerState<S>) -> Result<()> {
    let addr: SocketAddr = state
        .config
        .server
        .bind
        .parse()
        .map_err(|e| RedatorError::Config(format!("Invalid bind address '{}': {}", state.config.server.bind, e)))?;
    let listener = TcpListener::bind(addr).await?;
    serve_with_listener(listener, state).await
}

pub async fn serve_with_listener<S: Storage + 'static>(listener: TcpListener, state: ServerState<S>) -> Result<()> {
    let addr = listener.local_addr()?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
