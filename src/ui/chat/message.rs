//! A single chat bubble and the typing indicator.

use chrono::{DateTime, Utc};

use crate::config::AgentConfig;
use crate::session::ChatMessage;
use crate::ui::components::{BadgeVariant, avatar, badge};
use crate::ui::markup::{escape_html, initials, relative_time, render_content};

fn agent_avatar(agent: &AgentConfig) -> String {
    avatar(
        agent.avatar.as_deref(),
        &agent.name,
        &initials(&agent.name),
        "avatar-sm avatar-agent",
    )
}

/// One message bubble. `now` drives the relative timestamp.
#[must_use]
pub fn message_bubble(message: &ChatMessage, agent: &AgentConfig, now: DateTime<Utc>) -> String {
    let is_user = message.is_user();
    let (side, sender_label) = if is_user {
        ("user", "You".to_string())
    } else {
        ("agent", escape_html(&agent.name))
    };
    let stamp = badge(
        BadgeVariant::Outline,
        "message-time",
        &escape_html(&relative_time(message.timestamp, now)),
    );
    let (leading, trailing) = if is_user {
        (String::new(), avatar(None, "You", "U", "avatar-sm avatar-user"))
    } else {
        (agent_avatar(agent), String::new())
    };

    format!(
        r#"<div class="message message-{side}" id="msg-{id}" data-sender="{side}">{leading}<div class="message-body"><div class="message-meta"><span class="message-sender">{sender_label}</span>{stamp}</div><div class="bubble bubble-{side}">{content}</div></div>{trailing}</div>"#,
        id = escape_html(&message.id),
        content = render_content(&message.content),
    )
}

/// Placeholder bubble shown while a reply is pending.
#[must_use]
pub fn typing_bubble(agent: &AgentConfig) -> String {
    format!(
        r#"<div class="message message-agent" id="typing-indicator" data-sender="agent">{}<div class="message-body"><div class="message-meta"><span class="message-sender">{}</span></div><div class="bubble bubble-agent typing-indicator"><span class="typing-dots"><span></span><span></span><span></span></span><span class="typing-label">Typing...</span></div></div></div>"#,
        agent_avatar(agent),
        escape_html(&agent.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Presence;
    use crate::session::{Action, SessionState};

    fn agent() -> AgentConfig {
        AgentConfig {
            name: "AI Assistant Pro".to_string(),
            description: String::new(),
            status: Presence::Online,
            avatar: None,
            placeholder: String::new(),
        }
    }

    #[test]
    fn test_user_bubble() {
        let mut state = SessionState::default();
        let now = Utc::now();
        state.reduce(Action::Send("a\nb **c**".to_string()), now);
        let html = message_bubble(&state.messages()[0], &agent(), now);

        assert!(html.contains("message-user"));
        assert!(html.contains(">You<"));
        assert!(html.contains("a<br/>b <strong>c</strong>"));
        assert!(html.contains("less than a minute ago"));
        assert!(html.contains(r#"<span class="avatar-fallback">U</span>"#));
    }

    #[test]
    fn test_agent_bubble_uses_agent_name() {
        let mut state = SessionState::default();
        let now = Utc::now();
        state.reduce(Action::Send("q".to_string()), now);
        state.reduce(Action::ReplyReady("answer".to_string()), now);
        let html = message_bubble(&state.messages()[1], &agent(), now);

        assert!(html.contains("message-agent"));
        assert!(html.contains(">AI Assistant Pro<"));
        assert!(html.contains(">AAP<"));
    }

    #[test]
    fn test_typing_bubble() {
        let html = typing_bubble(&agent());
        assert!(html.contains("Typing..."));
        assert!(html.contains("typing-indicator"));
    }
}
