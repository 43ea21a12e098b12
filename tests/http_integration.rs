use std::sync::Arc;
use std::time::Duration;

use agent_chat::AppState;
use agent_chat::config::{
    AgentConfig, AppConfig, LoggingConfig, Presence, ReplyConfig, ScrollConfig, ServerConfig,
    SessionConfig,
};
use agent_chat::server::{SessionInfo, ScrollState, build_router, session_settings};
use agent_chat::session::{ChatMessage, Sender, SessionStore};
use agent_chat::synthesizer::CANNED_REPLIES;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use futures::StreamExt;
use serde_json::json;
use tower::ServiceExt;

fn test_config(min_delay_ms: u64, max_delay_ms: u64) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: "static".to_string(),
            request_timeout_secs: 30,
        },
        agent: AgentConfig {
            name: "AI Assistant Pro".to_string(),
            description: "Your intelligent business automation partner".to_string(),
            status: Presence::Online,
            avatar: None,
            placeholder: "Ask me anything about our platform...".to_string(),
        },
        reply: ReplyConfig {
            min_delay_ms,
            max_delay_ms,
        },
        scroll: ScrollConfig { threshold: 100.0 },
        session: SessionConfig {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
        },
        logging: LoggingConfig { json: false },
    }
}

fn test_state() -> AppState {
    state_with_delay(20, 40)
}

fn state_with_delay(min_delay_ms: u64, max_delay_ms: u64) -> AppState {
    let config = test_config(min_delay_ms, max_delay_ms);
    AppState {
        sessions: SessionStore::new(session_settings(&config)),
        config: Arc::new(config),
    }
}

fn test_server() -> (TestServer, AppState) {
    server_for(test_state())
}

fn server_for(state: AppState) -> (TestServer, AppState) {
    let server = TestServer::new(build_router(state.clone())).expect("test server");
    (server, state)
}

async fn create_session(server: &TestServer) -> String {
    let response = server.post("/api/sessions").await;
    response.assert_status(StatusCode::CREATED);
    response.json::<SessionInfo>().id
}

async fn wait_for_messages(server: &TestServer, id: &str, count: usize) -> Vec<ChatMessage> {
    for _ in 0..300 {
        let messages: Vec<ChatMessage> = server
            .get(&format!("/api/sessions/{id}/messages"))
            .await
            .json();
        if messages.len() >= count {
            return messages;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session {id} never reached {count} messages");
}

#[tokio::test]
async fn test_index_renders_page_with_new_session() {
    let (server, state) = test_server();

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("Welcome to AI Assistant Pro!"));
    assert!(html.contains("Quick Actions"));
    assert!(html.contains(r#"placeholder="Ask me anything about our platform...""#));
    assert_eq!(state.sessions.len(), 1);
    let id = &state.sessions.list_ids()[0];
    assert!(html.contains(&format!(r#"data-session-id="{id}""#)));
}

#[tokio::test]
async fn test_send_then_reply() {
    let (server, _state) = server_for(state_with_delay(100, 150));
    let id = create_session(&server).await;

    server
        .post(&format!("/api/sessions/{id}/messages"))
        .json(&json!({ "message": "  Hello there  " }))
        .await
        .assert_status(StatusCode::ACCEPTED);

    let info: SessionInfo = server.get(&format!("/api/sessions/{id}")).await.json();
    assert!(info.is_typing);

    let messages = wait_for_messages(&server, &id, 2).await;
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].content, "Hello there");
    assert_eq!(messages[1].sender, Sender::Agent);
    assert!(CANNED_REPLIES.contains(&messages[1].content.as_str()));
    assert!(messages[0].timestamp < messages[1].timestamp);

    let info: SessionInfo = server.get(&format!("/api/sessions/{id}")).await.json();
    assert!(!info.is_typing);
    assert_eq!(info.message_count, 2);
}

#[tokio::test]
async fn test_form_encoded_send() {
    let (server, _state) = test_server();
    let id = create_session(&server).await;

    server
        .post(&format!("/api/sessions/{id}/messages"))
        .form(&[("message", "from a form")])
        .await
        .assert_status(StatusCode::ACCEPTED);

    let messages = wait_for_messages(&server, &id, 1).await;
    assert_eq!(messages[0].content, "from a form");
}

#[tokio::test]
async fn test_blank_and_busy_sends_are_ignored() {
    let (server, _state) = server_for(state_with_delay(300, 300));
    let id = create_session(&server).await;
    let path = format!("/api/sessions/{id}/messages");

    server
        .post(&path)
        .json(&json!({ "message": "   \n\t" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .post(&path)
        .json(&json!({ "message": "first" }))
        .await
        .assert_status(StatusCode::ACCEPTED);
    server
        .post(&path)
        .json(&json!({ "message": "second" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let messages = wait_for_messages(&server, &id, 2).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "first");
}

#[tokio::test]
async fn test_quick_action_sends_and_returns_toast() {
    let (server, _state) = test_server();
    let id = create_session(&server).await;

    let response = server
        .post(&format!("/api/sessions/{id}/actions/schedule"))
        .await;
    response.assert_status_ok();
    let toast = response.text();
    assert!(toast.contains("Quick Action Selected"));
    assert!(toast.contains("Started conversation with: schedule"));

    let messages = wait_for_messages(&server, &id, 1).await;
    assert_eq!(
        messages[0].content,
        "I'd like to schedule a meeting or consultation. What are the available options?"
    );
}

#[tokio::test]
async fn test_unknown_quick_action() {
    let (server, _state) = test_server();
    let id = create_session(&server).await;

    server
        .post(&format!("/api/sessions/{id}/actions/foo"))
        .await
        .assert_status_ok();

    let messages = wait_for_messages(&server, &id, 1).await;
    assert_eq!(messages[0].content, "Selected action: foo");
}

#[tokio::test]
async fn test_quick_actions_listing() {
    let (server, _state) = test_server();

    let actions: serde_json::Value = server.get("/api/quick-actions").await.json();
    let ids: Vec<&str> = actions
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert_eq!(ids, ["get-started", "documentation", "schedule", "support"]);
}

#[tokio::test]
async fn test_scroll_reporting() {
    let (server, _state) = test_server();
    let id = create_session(&server).await;
    let path = format!("/api/sessions/{id}/scroll");

    let state: ScrollState = server
        .post(&path)
        .json(&json!({ "scroll_top": 0.0, "scroll_height": 1000.0, "client_height": 200.0 }))
        .await
        .json();
    assert!(!state.auto_scroll);
    assert!(state.show_jump_button);

    let fragment = server
        .get(&format!("/api/sessions/{id}/fragments/messages"))
        .await
        .text();
    assert!(fragment.contains("Welcome to"));

    let state: ScrollState = server
        .post(&path)
        .json(&json!({ "scroll_top": 750.0, "scroll_height": 1000.0, "client_height": 200.0 }))
        .await
        .json();
    assert!(state.auto_scroll);
    assert!(!state.show_jump_button);

    server
        .post(&format!("/api/sessions/{id}/scroll/bottom"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (server, _state) = test_server();

    let response = server.get("/api/sessions/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Session not found: missing");

    server
        .post("/api/sessions/missing/messages")
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/sessions/missing/events")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_cancels_pending_reply() {
    let (server, state) = server_for(state_with_delay(300, 300));
    let id = create_session(&server).await;

    server
        .post(&format!("/api/sessions/{id}/messages"))
        .json(&json!({ "message": "hello" }))
        .await
        .assert_status(StatusCode::ACCEPTED);
    let session = state.sessions.get(&id).expect("session exists");

    server
        .delete(&format!("/api/sessions/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/sessions/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(session.is_closed());
    assert_eq!(session.message_count(), 1);
}

#[tokio::test]
async fn test_event_stream_pushes_updates_until_closed() {
    let state = test_state();
    let session = state.sessions.create();
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::get(format!("/api/sessions/{}/events", session.id()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();

    // Initial resync.
    while !seen.contains("event: scroll.changed") {
        let chunk = body.next().await.expect("stream open").expect("chunk");
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert!(seen.contains("Welcome to AI Assistant Pro!"));

    assert!(session.send_message("ping"));
    state.sessions.remove(session.id());

    let mut rest = String::new();
    while let Some(chunk) = body.next().await {
        rest.push_str(&String::from_utf8_lossy(&chunk.expect("chunk")));
    }

    assert!(rest.contains("event: messages.updated"));
    assert!(rest.contains("ping"));
    assert!(rest.contains(r#""is_typing":true"#));
    assert!(rest.contains("event: scroll.bottom"));
    assert!(rest.trim_end().ends_with(r#"data: {"type":"session.closed"}"#));
}
