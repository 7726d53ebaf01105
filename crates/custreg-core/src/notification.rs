//! User-visible notifications emitted by the registration workflow.

use serde::{Deserialize, Serialize};

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A short toast-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn registered() -> Self {
        Self {
            title: "Success".to_string(),
            description: "Customer registered successfully!".to_string(),
            variant: NotificationVariant::Default,
        }
    }

    /// The single generic failure message; the cause is never shown.
    pub fn registration_failed() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Failed to register customer. Please try again.".to_string(),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}
