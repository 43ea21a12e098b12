//! HTTP surface: page, JSON API, fragments and the per-session SSE stream.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, FromRequest, Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::actions::{ActionRequest, QuickAction, QuickActionDto, TOAST_TITLE};
use crate::config::{AgentConfig, AppConfig};
use crate::error::ChatError;
use crate::events::{ChatEvent, SessionEvent, sse_event};
use crate::scroll::ScrollMetrics;
use crate::session::{ChatMessage, Session, SessionSettings, SessionStore};
use crate::synthesizer::CannedResponder;
use crate::ui::app::chat_page;
use crate::ui::chat::message_items;
use crate::ui::components::toast;

/// Interval between SSE keep-alive comments.
pub const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Request bodies are tiny; anything larger is a client bug.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Session settings derived from configuration.
#[must_use]
pub fn session_settings(config: &AppConfig) -> SessionSettings {
    SessionSettings {
        responder: Arc::new(CannedResponder),
        reply_delay: config.reply.delay(),
        scroll_threshold: config.scroll.threshold,
    }
}

/// Build the application router. Split from [`start_server`] so tests can
/// drive it without binding a socket.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = Duration::from_secs(state.config.server.request_timeout_secs.max(1));
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(index_handler))
        .route("/api/quick-actions", get(api_quick_actions))
        .route(
            "/api/sessions",
            get(api_list_sessions).post(api_create_session),
        )
        .route(
            "/api/sessions/{id}",
            get(api_get_session).delete(api_delete_session),
        )
        .route(
            "/api/sessions/{id}/messages",
            get(api_get_messages).post(api_send_message),
        )
        .route(
            "/api/sessions/{id}/actions/{action_id}",
            post(api_quick_action),
        )
        .route("/api/sessions/{id}/scroll", post(api_scroll))
        .route("/api/sessions/{id}/scroll/bottom", post(api_scroll_bottom))
        .route("/api/sessions/{id}/events", get(api_session_events))
        .route(
            "/api/sessions/{id}/fragments/messages",
            get(api_messages_fragment),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically close sessions that have been idle longer than `idle_timeout`.
pub fn spawn_session_sweeper(
    sessions: SessionStore,
    idle_timeout: Duration,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = sessions.cleanup_expired_with_timeout(idle_timeout);
                    if removed > 0 {
                        info!(
                            name: "session.swept",
                            removed,
                            remaining = sessions.len(),
                            "Idle sessions closed"
                        );
                    }
                }
            }
        }
    })
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "agent.config.loaded",
        agent = %config.agent.name,
        status = config.agent.status.label(),
        min_delay_ms = config.reply.min_delay_ms,
        max_delay_ms = config.reply.max_delay_ms,
        "Agent configuration loaded"
    );

    let sessions = SessionStore::new(session_settings(&config));
    let state = AppState {
        sessions: sessions.clone(),
        config: Arc::clone(&config),
    };

    let shutdown = CancellationToken::new();
    let sweeper = spawn_session_sweeper(
        sessions.clone(),
        config.session.idle_timeout(),
        config.session.sweep_interval(),
        shutdown.clone(),
    );

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    sessions.close_all();
    sweeper.await?;

    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(name: "server.shutdown", "Shutdown signal received");
}

fn find_session(state: &AppState, id: &str) -> Result<Session, ChatError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Create a page session and render the chat page for it.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    Html(chat_page(
        session.id(),
        &session.snapshot(),
        &state.config.agent,
        Utc::now(),
    ))
}

/// GET /api/sessions/:id/fragments/messages - Current message list.
async fn api_messages_fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ChatError> {
    let session = find_session(&state, &id)?;
    Ok(Html(message_items(
        &session.snapshot(),
        &state.config.agent,
        Utc::now(),
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Session info for listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub message_count: usize,
    pub is_typing: bool,
    pub auto_scroll: bool,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        let snapshot = session.snapshot();
        Self {
            id: session.id().to_string(),
            message_count: snapshot.message_count(),
            is_typing: snapshot.is_typing(),
            auto_scroll: snapshot.auto_scroll(),
        }
    }
}

/// Scroll flags returned after a scroll report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrollState {
    pub auto_scroll: bool,
    pub show_jump_button: bool,
}

/// Body of a send request.
#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    /// Raw composer text.
    #[serde(default)]
    message: String,
}

/// Accepts the composer text as JSON or as a urlencoded form.
struct MessageText(String);

impl<S> FromRequest<S> for MessageText
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let body = if is_json {
            Json::<SendMessageRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        } else {
            Form::<SendMessageRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?
                .0
        };
        Ok(Self(body.message))
    }
}

/// GET /api/quick-actions - The fixed quick actions.
async fn api_quick_actions() -> Json<Vec<QuickActionDto>> {
    Json(QuickAction::ALL.into_iter().map(QuickActionDto::from).collect())
}

/// GET /api/sessions - List all sessions.
async fn api_list_sessions(State(state): State<AppState>) -> Json<Vec<SessionInfo>> {
    let sessions: Vec<SessionInfo> = state
        .sessions
        .list_ids()
        .iter()
        .filter_map(|id| state.sessions.get(id))
        .map(|s| SessionInfo::from(&s))
        .collect();

    Json(sessions)
}

/// POST /api/sessions - Create a new session.
async fn api_create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionInfo>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(SessionInfo::from(&session)))
}

/// GET /api/sessions/:id - Get session details.
async fn api_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>, ChatError> {
    let session = find_session(&state, &id)?;
    Ok(Json(SessionInfo::from(&session)))
}

/// DELETE /api/sessions/:id - Close a session and cancel its pending reply.
async fn api_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    state
        .sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(ChatError::SessionNotFound(id))
}

/// GET /api/sessions/:id/messages - Messages in order.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ChatError> {
    let session = find_session(&state, &id)?;
    Ok(Json(session.messages()))
}

/// POST /api/sessions/:id/messages - Submit composer text.
///
/// 202 when the message was appended, 204 when it was ignored (blank text or
/// a reply still pending).
async fn api_send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    MessageText(text): MessageText,
) -> Result<StatusCode, ChatError> {
    let session = find_session(&state, &id)?;
    if session.send_message(&text) {
        Ok(StatusCode::ACCEPTED)
    } else {
        tracing::debug!(session_id = %id, "Send ignored");
        Ok(StatusCode::NO_CONTENT)
    }
}

/// POST /api/sessions/:id/actions/:action_id - Quick action; returns a toast.
async fn api_quick_action(
    State(state): State<AppState>,
    Path((id, action_id)): Path<(String, String)>,
) -> Result<Html<String>, ChatError> {
    let session = find_session(&state, &id)?;
    let request = ActionRequest::parse(&action_id);
    let accepted = session.send_message(&request.message());

    info!(
        name: "chat.quick_action",
        session_id = %id,
        action = %request.id(),
        known = matches!(request, ActionRequest::Known(_)),
        accepted,
        "Quick action selected"
    );

    Ok(Html(toast(TOAST_TITLE, &request.toast_description())))
}

/// POST /api/sessions/:id/scroll - Report scroll geometry.
async fn api_scroll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(metrics): Json<ScrollMetrics>,
) -> Result<Json<ScrollState>, ChatError> {
    if !metrics.is_valid() {
        return Err(ChatError::InvalidScroll);
    }
    let session = find_session(&state, &id)?;
    let auto_scroll = session.scrolled(metrics);
    Ok(Json(ScrollState {
        auto_scroll,
        show_jump_button: !auto_scroll,
    }))
}

/// POST /api/sessions/:id/scroll/bottom - Jump to the newest message.
async fn api_scroll_bottom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    find_session(&state, &id)?.jump_to_bottom();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/events - SSE stream of page updates.
async fn api_session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ChatError> {
    let session = find_session(&state, &id)?;
    let mut rx = session.subscribe();
    let config = Arc::clone(&state.config);

    info!(name: "sse.connected", session_id = %id, "Event stream opened");

    let sse_stream = async_stream::stream! {
        // Catch up on anything that happened before the page connected.
        for event in resync_events(&session, &config.agent) {
            yield Ok::<String, Infallible>(sse_event(&event));
        }

        let mut keep_alive = tokio::time::interval(SSE_KEEP_ALIVE);
        keep_alive.tick().await;

        loop {
            let received = tokio::select! {
                _ = keep_alive.tick() => None,
                received = rx.recv() => Some(received),
            };

            let events = match received {
                None => {
                    yield Ok::<String, Infallible>(": keep-alive\n\n".to_string());
                    continue;
                }
                Some(Ok(event)) => chat_events(&event, &session, &config.agent),
                Some(Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!(session_id = %session.id(), skipped, "Event stream lagged; resyncing");
                    resync_events(&session, &config.agent)
                }
                Some(Err(RecvError::Closed)) => break,
            };

            let mut terminal = false;
            for event in events {
                terminal |= event.is_terminal();
                yield Ok::<String, Infallible>(sse_event(&event));
            }
            if terminal {
                break;
            }
        }

        tracing::debug!(session_id = %session.id(), "Event stream ended");
    };

    Ok(build_sse_response(Body::from_stream(sse_stream)))
}

/// Translate a session notification into the events the page consumes.
///
/// Message changes re-render the list from the current state, so a burst of
/// notifications always converges on the latest markup.
pub fn chat_events(event: &SessionEvent, session: &Session, agent: &AgentConfig) -> Vec<ChatEvent> {
    match event {
        SessionEvent::MessageAppended(_) => {
            let snapshot = session.snapshot();
            vec![ChatEvent::MessagesUpdated {
                html: message_items(&snapshot, agent, Utc::now()),
                follow: snapshot.auto_scroll(),
            }]
        }
        SessionEvent::TypingChanged(is_typing) => vec![ChatEvent::TypingChanged {
            is_typing: *is_typing,
        }],
        SessionEvent::AutoScrollChanged(auto_scroll) => vec![ChatEvent::ScrollChanged {
            auto_scroll: *auto_scroll,
            show_jump_button: !auto_scroll,
        }],
        SessionEvent::ScrollToBottom => vec![ChatEvent::ScrollToBottom],
        SessionEvent::Closed => vec![ChatEvent::SessionClosed],
    }
}

/// Full picture of the session, sent on connect and after a lag.
fn resync_events(session: &Session, agent: &AgentConfig) -> Vec<ChatEvent> {
    let snapshot = session.snapshot();
    let auto_scroll = snapshot.auto_scroll();
    vec![
        ChatEvent::MessagesUpdated {
            html: message_items(&snapshot, agent, Utc::now()),
            follow: auto_scroll,
        },
        ChatEvent::TypingChanged {
            is_typing: snapshot.is_typing(),
        },
        ChatEvent::ScrollChanged {
            auto_scroll,
            show_jump_button: !auto_scroll,
        },
    ]
}

fn build_sse_response(body: Body) -> Response {
    let mut resp = Response::new(body);
    let h = resp.headers_mut();
    h.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    h.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    h.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    h.insert("X-Accel-Buffering", HeaderValue::from_static("no"));
    resp
}
