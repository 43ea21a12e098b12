//! Message list region: welcome placeholder, bubbles, typing indicator and the
//! jump-to-bottom button.

use chrono::{DateTime, Utc};

use super::message::{message_bubble, typing_bubble};
use crate::config::AgentConfig;
use crate::session::SessionState;
use crate::ui::components::{Button, ButtonSize, ButtonVariant, Icon, scroll_area};
use crate::ui::markup::{escape_html, initials};

/// Shown until the first message exists.
#[must_use]
pub fn welcome_placeholder(agent: &AgentConfig) -> String {
    format!(
        r#"<div class="welcome" id="welcome"><div class="welcome-mark">{}</div><h3 class="welcome-title">Welcome to {}!</h3><p class="welcome-text">I'm here to help you with any questions or tasks you might have. Feel free to start a conversation or use one of the quick actions above.</p></div>"#,
        escape_html(&initials(&agent.name)),
        escape_html(&agent.name)
    )
}

/// Contents of the scroll region. Pushed to the page on every change.
#[must_use]
pub fn message_items(state: &SessionState, agent: &AgentConfig, now: DateTime<Utc>) -> String {
    if state.shows_welcome() {
        return welcome_placeholder(agent);
    }

    let mut html: String = state
        .messages()
        .iter()
        .map(|m| message_bubble(m, agent, now))
        .collect();
    if state.is_typing() {
        html.push_str(&typing_bubble(agent));
    }
    html
}

/// Jump-to-bottom button; hidden while auto-scroll is on.
#[must_use]
pub fn jump_button(show: bool) -> String {
    Button::new(ButtonVariant::Accent)
        .size(ButtonSize::Icon)
        .class("jump-to-bottom")
        .attr("id", "jump-to-bottom")
        .attr("aria-label", "Scroll to bottom")
        .hidden(!show)
        .render(&Icon::ArrowDown.render(""))
}

/// The whole message region with its scroll container.
#[must_use]
pub fn message_region(state: &SessionState, agent: &AgentConfig, now: DateTime<Utc>) -> String {
    let items = format!(
        r#"<div id="message-list" class="message-list" aria-live="polite" aria-label="Chat messages">{}</div>"#,
        message_items(state, agent, now)
    );
    format!(
        r#"<div class="message-region">{}{}</div>"#,
        scroll_area("message-viewport", "message-viewport", &items),
        jump_button(state.scroll().show_jump_button())
    )
}
