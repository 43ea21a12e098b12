//! Agent header: avatar, presence, name and description.

use crate::config::{AgentConfig, Presence};
use crate::ui::components::{BadgeVariant, Button, ButtonSize, ButtonVariant, Icon, avatar, badge};
use crate::ui::markup::{escape_html, initials};

fn presence_class(status: Presence) -> &'static str {
    match status {
        Presence::Online => "status-online",
        Presence::Busy => "status-busy",
        Presence::Offline => "status-offline",
    }
}

fn presence_badge(status: Presence) -> BadgeVariant {
    match status {
        Presence::Online => BadgeVariant::Success,
        Presence::Busy => BadgeVariant::Warning,
        Presence::Offline => BadgeVariant::Muted,
    }
}

/// Header bar for the chat page.
#[must_use]
pub fn agent_header(agent: &AgentConfig) -> String {
    let status_class = presence_class(agent.status);
    let status_badge = badge(
        presence_badge(agent.status),
        "presence-badge",
        &format!(
            r#"<span class="status-dot {status_class}"></span>{}"#,
            agent.status.label()
        ),
    );
    let settings = Button::new(ButtonVariant::Ghost)
        .size(ButtonSize::Sm)
        .attr("aria-label", "Settings")
        .render(&Icon::Settings.render(""));
    let more = Button::new(ButtonVariant::Ghost)
        .size(ButtonSize::Sm)
        .attr("aria-label", "More options")
        .render(&Icon::MoreVertical.render(""));

    format!(
        r#"<header class="agent-header surface-card">
    <div class="agent-identity">
        <div class="agent-avatar-wrap">
            {avatar}
            <span class="status-indicator {status_class}"></span>
        </div>
        <div class="agent-text">
            <h1 class="agent-name">{name}</h1>
            <div class="agent-meta">
                {status_badge}
                <span class="agent-description">{description}</span>
            </div>
        </div>
    </div>
    <div class="agent-tools">{settings}{more}</div>
</header>"#,
        avatar = avatar(
            agent.avatar.as_deref(),
            &agent.name,
            &initials(&agent.name),
            "avatar-lg"
        ),
        name = escape_html(&agent.name),
        description = escape_html(&agent.description),
    )
}
