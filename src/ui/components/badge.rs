//! Badge component for status indicators and tags.

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Default badge style.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Warning badge.
    Warning,
    /// Muted badge.
    Muted,
    /// Outline badge.
    Outline,
}

impl BadgeVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Default => "badge-default",
            Self::Success => "badge-success",
            Self::Warning => "badge-warning",
            Self::Muted => "badge-muted",
            Self::Outline => "badge-outline",
        }
    }
}

/// Badge wrapping already-safe inner HTML.
#[must_use]
pub fn badge(variant: BadgeVariant, class: &str, children: &str) -> String {
    format!(
        r#"<span class="badge {} {class}">{children}</span>"#,
        variant.classes()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_classes() {
        let html = badge(BadgeVariant::Success, "small", "Online");
        assert_eq!(
            html,
            r#"<span class="badge badge-success small">Online</span>"#
        );
    }
}
