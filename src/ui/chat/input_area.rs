//! Composer: textarea, attachment and voice buttons, send button and
//! keyboard hint.

use crate::ui::components::{Button, ButtonSize, ButtonVariant, Icon};
use crate::ui::markup::escape_html;

/// Message composer form. Disabled while a reply is pending.
#[must_use]
pub fn composer(placeholder: &str, is_typing: bool) -> String {
    let disabled = if is_typing { " disabled" } else { "" };
    // Decorative; no handler is attached to either.
    let attach = Button::new(ButtonVariant::Ghost)
        .size(ButtonSize::Icon)
        .class("composer-tool")
        .attr("aria-label", "Attach file")
        .render(&Icon::Paperclip.render(""));
    let voice = Button::new(ButtonVariant::Outline)
        .size(ButtonSize::Icon)
        .class("composer-tool")
        .attr("aria-label", "Voice input")
        .attr("aria-pressed", "false")
        .render(&Icon::Mic.render(""));
    let send = Button::new(ButtonVariant::Accent)
        .size(ButtonSize::Icon)
        .submit()
        .class("send-button")
        .attr("id", "send-button")
        .attr("aria-label", "Send message")
        .disabled(is_typing)
        .render(&Icon::Send.render(""));

    format!(
        r#"<form id="composer" class="composer surface-card" autocomplete="off">
    <div class="composer-row">
        {attach}
        <textarea id="composer-input" name="message" class="composer-input" rows="1" placeholder="{placeholder}"{disabled}></textarea>
        {voice}
        {send}
    </div>
    <p class="composer-hint">Press Enter to send, Shift + Enter for new line</p>
</form>"#,
        placeholder = escape_html(placeholder),
    )
}
