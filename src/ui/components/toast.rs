//! Toast notification.

use crate::ui::markup::escape_html;

/// Transient notification card. The page script removes it after a few seconds.
#[must_use]
pub fn toast(title: &str, description: &str) -> String {
    format!(
        r#"<div class="toast" role="status" aria-live="polite"><div class="toast-title">{}</div><div class="toast-description">{}</div></div>"#,
        escape_html(title),
        escape_html(description)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_escapes_text() {
        let html = toast("Quick Action Selected", "Started conversation with: <x>");
        assert!(html.contains("Quick Action Selected"));
        assert!(html.contains("Started conversation with: &lt;x&gt;"));
    }
}
