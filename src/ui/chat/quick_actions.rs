//! Quick-action button row.

use crate::actions::QuickAction;
use crate::ui::components::{Button, ButtonSize, ButtonVariant, Icon};
use crate::ui::markup::escape_html;

/// Grid of the fixed quick actions.
#[must_use]
pub fn quick_actions() -> String {
    let buttons: String = QuickAction::ALL
        .into_iter()
        .map(|action| {
            let inner = format!(
                r#"<span class="quick-action-icon">{}</span><span class="quick-action-label">{}</span>"#,
                Icon::from(action.icon()).render(""),
                escape_html(action.label())
            );
            Button::new(ButtonVariant::Outline)
                .size(ButtonSize::Sm)
                .class("quick-action")
                .attr("data-action-id", action.id())
                .attr("title", action.description())
                .render(&inner)
        })
        .collect();

    format!(
        r#"<section class="quick-actions" id="quick-actions">
    <h3 class="section-title">Quick Actions</h3>
    <div class="quick-actions-grid">{buttons}</div>
</section>"#
    )
}
