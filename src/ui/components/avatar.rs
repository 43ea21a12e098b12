//! Avatar component with image and fallback support.

use crate::ui::markup::escape_html;

/// Round avatar showing an image when `src` is set, otherwise `fallback` text.
///
/// ```rust
/// use agent_chat::ui::components::avatar;
///
/// let html = avatar(None, "AI Assistant", "AA", "avatar-sm");
/// assert!(html.contains(">AA</span>"));
/// ```
#[must_use]
pub fn avatar(src: Option<&str>, alt: &str, fallback: &str, class: &str) -> String {
    let inner = match src.filter(|s| !s.is_empty()) {
        Some(src) => format!(
            r#"<img class="avatar-image" src="{}" alt="{}"/>"#,
            escape_html(src),
            escape_html(alt)
        ),
        None => format!(
            r#"<span class="avatar-fallback">{}</span>"#,
            escape_html(fallback)
        ),
    };

    format!(r#"<span class="avatar {class}">{inner}</span>"#)
}
