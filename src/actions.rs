//! Quick actions shown above the message list.
//!
//! Each action maps to canned user text that is sent exactly as if the user
//! had typed it. Ids outside the fixed set fall back to echoing the id.

use std::fmt;

use serde::Serialize;

/// Title of the toast shown when a quick action is used.
pub const TOAST_TITLE: &str = "Quick Action Selected";

/// Icon drawn on a quick-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionIcon {
    MessageSquare,
    FileText,
    Calendar,
    HelpCircle,
}

/// The fixed set of quick actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    GetStarted,
    Documentation,
    Schedule,
    Support,
}

impl QuickAction {
    /// All actions in display order.
    pub const ALL: [Self; 4] = [
        Self::GetStarted,
        Self::Documentation,
        Self::Schedule,
        Self::Support,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::GetStarted => "get-started",
            Self::Documentation => "documentation",
            Self::Schedule => "schedule",
            Self::Support => "support",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GetStarted => "Get Started",
            Self::Documentation => "Documentation",
            Self::Schedule => "Schedule Meeting",
            Self::Support => "Get Support",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::GetStarted => "Begin our conversation",
            Self::Documentation => "View help resources",
            Self::Schedule => "Book a consultation",
            Self::Support => "Contact assistance",
        }
    }

    #[must_use]
    pub fn icon(self) -> ActionIcon {
        match self {
            Self::GetStarted => ActionIcon::MessageSquare,
            Self::Documentation => ActionIcon::FileText,
            Self::Schedule => ActionIcon::Calendar,
            Self::Support => ActionIcon::HelpCircle,
        }
    }

    /// User text sent when the action is activated.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::GetStarted => {
                "Hi! I'd like to get started. Can you help me understand how this platform works?"
            }
            Self::Documentation => "Can you show me the documentation or help resources?",
            Self::Schedule => {
                "I'd like to schedule a meeting or consultation. What are the available options?"
            }
            Self::Support => "I need support with a specific issue. Can you assist me?",
        }
    }

    /// Look up an action by its id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// An activation request as received from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    /// One of the fixed actions.
    Known(QuickAction),
    /// Any other id; the id is echoed back to the user.
    Unknown(String),
}

impl ActionRequest {
    #[must_use]
    pub fn parse(id: &str) -> Self {
        QuickAction::from_id(id).map_or_else(|| Self::Unknown(id.to_string()), Self::Known)
    }

    /// The raw id as activated.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Known(action) => action.id(),
            Self::Unknown(id) => id,
        }
    }

    /// User text to send for this activation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Known(action) => action.message().to_string(),
            Self::Unknown(id) => format!("Selected action: {id}"),
        }
    }

    /// Body of the confirmation toast.
    #[must_use]
    pub fn toast_description(&self) -> String {
        format!("Started conversation with: {}", self.id())
    }
}

/// JSON view of a quick action for `/api/quick-actions`.
#[derive(Debug, Clone, Serialize)]
pub struct QuickActionDto {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: ActionIcon,
}

impl From<QuickAction> for QuickActionDto {
    fn from(action: QuickAction) -> Self {
        Self {
            id: action.id(),
            label: action.label(),
            description: action.description(),
            icon: action.icon(),
        }
    }
}
