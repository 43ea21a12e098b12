//! Chat card: header, quick actions, message region and composer.

use chrono::{DateTime, Utc};

use super::header::agent_header;
use super::input_area::composer;
use super::message_list::message_region;
use super::quick_actions::quick_actions;
use crate::config::AgentConfig;
use crate::session::SessionState;
use crate::ui::markup::escape_html;

/// Full chat layout for one page session.
#[must_use]
pub fn chat_shell(
    session_id: &str,
    state: &SessionState,
    agent: &AgentConfig,
    now: DateTime<Utc>,
) -> String {
    format!(
        r#"<div id="chat-root" class="chat-root" data-session-id="{session_id}">
    {header}
    {quick_actions}
    <div class="chat-card surface-card">
        {messages}
        {composer}
    </div>
</div>"#,
        session_id = escape_html(session_id),
        header = agent_header(agent),
        quick_actions = quick_actions(),
        messages = message_region(state, agent, now),
        composer = composer(&agent.placeholder, state.is_typing()),
    )
}
