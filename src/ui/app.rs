//! Page document.

use chrono::{DateTime, Utc};

use crate::config::AgentConfig;
use crate::session::SessionState;
use crate::ui::chat::chat_shell;
use crate::ui::markup::escape_html;

/// Wrap page content in the HTML document.
#[must_use]
pub fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat with an AI agent">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/app.css">
    <script defer src="/static/chat.js"></script>
</head>
<body>
    <main id="app" class="app">
        {content}
    </main>
    <div id="toast-region" class="toast-region" aria-live="polite"></div>
</body>
</html>"#,
        title = escape_html(title),
    )
}

/// The chat page for a freshly created session.
#[must_use]
pub fn chat_page(
    session_id: &str,
    state: &SessionState,
    agent: &AgentConfig,
    now: DateTime<Utc>,
) -> String {
    html_shell(
        &format!("Chat - {}", agent.name),
        &chat_shell(session_id, state, agent, now),
    )
}
