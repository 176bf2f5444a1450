//! MCP HTTP+SSE transport.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming the URL
//! to POST JSON-RPC messages to. Replies are pushed back on the event stream
//! as `message` events.

use crate::config::SseConfig;
use crate::error::{MathError, Result};
use crate::mcp::McpServer;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Open SSE sessions keyed by session id.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<Mutex<HashMap<Uuid, mpsc::Sender<String>>>>,
}

impl Sessions {
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, mpsc::Sender<String>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, id: Uuid, tx: mpsc::Sender<String>) {
        self.lock().insert(id, tx);
    }

    fn remove(&self, id: &Uuid) {
        self.lock().remove(id);
    }

    fn get(&self, id: &Uuid) -> Option<mpsc::Sender<String>> {
        self.lock().get(id).cloned()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Removes its session when the event stream is dropped.
struct SessionGuard {
    id: Uuid,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
        tracing::info!("SSE session {} closed", self.id);
    }
}

struct SessionStream {
    rx: mpsc::Receiver<String>,
    shutdown: watch::Receiver<bool>,
    _guard: SessionGuard,
}

#[derive(Clone)]
struct SseState {
    server: Arc<McpServer>,
    sessions: Sessions,
    shutdown: watch::Receiver<bool>,
    message_path: String,
    channel_capacity: usize,
    keep_alive: Duration,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

/// SSE transport bound to one `McpServer`.
pub struct SseTransport {
    state: SseState,
    sse_path: String,
    host: String,
    shutdown: watch::Sender<bool>,
}

impl SseTransport {
    pub fn new(server: Arc<McpServer>, config: &SseConfig) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);

        Self {
            state: SseState {
                server,
                sessions: Sessions::default(),
                shutdown: shutdown_rx,
                message_path: config.message_path.clone(),
                channel_capacity: config.channel_capacity.max(1),
                keep_alive: Duration::from_secs(config.keep_alive_secs.max(1)),
            },
            sse_path: config.sse_path.clone(),
            host: config.host.clone(),
            shutdown,
        }
    }

    /// Build the axum router for this transport.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .route(&self.sse_path, get(open_stream))
            .route(&self.state.message_path, post(post_message));

        let trimmed = self.state.message_path.trim_end_matches('/');
        if !trimmed.is_empty() && trimmed != self.state.message_path {
            router = router.route(trimmed, post(post_message));
        }

        router
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    pub fn sessions(&self) -> Sessions {
        self.state.sessions.clone()
    }

    /// End every open event stream.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Bind `host:port` and serve until SIGINT/SIGTERM.
    pub async fn serve(self, port: u16) -> Result<()> {
        let app = self.router();
        let addr = format!("{}:{}", self.host, port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| MathError::Transport(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(
            "{} listening on http://{}{}",
            self.state.server.name(),
            addr,
            self.sse_path
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                self.shutdown();
            })
            .await?;

        tracing::info!("SSE transport shut down gracefully");
        Ok(())
    }
}

async fn health(State(state): State<SseState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.sessions.len()
    }))
}

async fn open_stream(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(state.channel_capacity);
    state.sessions.insert(id, tx);
    tracing::info!("SSE session {} opened", id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", state.message_path, id.simple()));

    let session = SessionStream {
        rx,
        shutdown: state.shutdown.clone(),
        _guard: SessionGuard {
            id,
            sessions: state.sessions.clone(),
        },
    };

    let messages = stream::unfold(session, |mut session| async move {
        tokio::select! {
            biased;
            message = session.rx.recv() => {
                let message = message?;
                let event = Event::default().event("message").data(message);
                Some((Ok::<_, Infallible>(event), session))
            }
            Ok(()) = session.shutdown.changed() => None,
        }
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);

    Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive))
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(raw_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };

    let Ok(session_id) = Uuid::parse_str(&raw_id) else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };

    let Some(tx) = state.sessions.get(&session_id) else {
        tracing::debug!("Message for unknown session {}", session_id);
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let message: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Failed to parse message for session {}: {}", session_id, e);
            return (StatusCode::BAD_REQUEST, "Could not parse message").into_response();
        }
    };

    if let Some(reply) = state.server.handle_value(message).await {
        match serde_json::to_string(&reply) {
            Ok(json) => {
                if tx.send(json).await.is_err() {
                    tracing::debug!("Session {} closed before reply was sent", session_id);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize reply: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        }
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received SIGINT, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
