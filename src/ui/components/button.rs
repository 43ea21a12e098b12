//! Button component with variants and sizes.

use std::fmt::Write as _;

use crate::ui::markup::escape_html;

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Subtle ghost button.
    Ghost,
    /// Outline button.
    Outline,
    /// Accent-filled button.
    Accent,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "btn-primary",
            Self::Ghost => "btn-ghost",
            Self::Outline => "btn-outline",
            Self::Accent => "btn-accent",
        }
    }
}

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    /// Small button.
    Sm,
    /// Medium button (default).
    #[default]
    Md,
    /// Icon-only button.
    Icon,
}

impl ButtonSize {
    /// Get CSS classes for this size.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Sm => "btn-sm",
            Self::Md => "btn-md",
            Self::Icon => "btn-icon",
        }
    }
}

/// Button markup builder.
///
/// ```rust
/// use agent_chat::ui::components::{Button, ButtonVariant};
///
/// let html = Button::new(ButtonVariant::Ghost).attr("title", "Settings").render("⚙");
/// assert!(html.contains("btn-ghost"));
/// assert!(html.contains(r#"title="Settings""#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Button<'a> {
    variant: ButtonVariant,
    size: ButtonSize,
    disabled: bool,
    hidden: bool,
    button_type: &'a str,
    class: &'a str,
    attrs: Vec<(&'a str, String)>,
}

impl<'a> Button<'a> {
    #[must_use]
    pub fn new(variant: ButtonVariant) -> Self {
        Self {
            variant,
            button_type: "button",
            ..Self::default()
        }
    }

    #[must_use]
    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn submit(mut self) -> Self {
        self.button_type = "submit";
        self
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = class;
        self
    }

    /// Extra attribute; the value is escaped.
    #[must_use]
    pub fn attr(mut self, name: &'a str, value: impl AsRef<str>) -> Self {
        self.attrs.push((name, escape_html(value.as_ref())));
        self
    }

    /// Render with already-safe inner HTML.
    #[must_use]
    pub fn render(&self, children: &str) -> String {
        let mut attrs = String::new();
        for (name, value) in &self.attrs {
            let _ = write!(attrs, r#" {name}="{value}""#);
        }
        if self.disabled {
            attrs.push_str(" disabled");
        }
        if self.hidden {
            attrs.push_str(" hidden");
        }

        format!(
            r#"<button type="{}" class="btn {} {} {}"{attrs}>{children}</button>"#,
            self.button_type,
            self.variant.classes(),
            self.size.classes(),
            self.class,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_button_type() {
        let html = Button::new(ButtonVariant::Primary).render("Go");
        assert!(html.starts_with(r#"<button type="button""#));
        assert!(html.contains("btn-primary btn-md"));
        assert!(html.ends_with(">Go</button>"));
    }

    #[test]
    fn test_disabled_submit() {
        let html = Button::new(ButtonVariant::Accent)
            .size(ButtonSize::Icon)
            .submit()
            .disabled(true)
            .render("");
        assert!(html.contains(r#"type="submit""#));
        assert!(html.contains(" disabled"));
    }

    #[test]
    fn test_attr_values_are_escaped() {
        let html = Button::new(ButtonVariant::Outline)
            .attr("data-action-id", "a\"b")
            .render("x");
        assert!(html.contains(r#"data-action-id="a&quot;b""#));
    }
}
