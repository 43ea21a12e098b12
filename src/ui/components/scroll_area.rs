//! Scrollable area component.

/// Scrollable container. The `id` is what the page script attaches its
/// scroll listener to.
#[must_use]
pub fn scroll_area(id: &str, class: &str, children: &str) -> String {
    format!(r#"<div id="{id}" class="scroll-area {class}">{children}</div>"#)
}
