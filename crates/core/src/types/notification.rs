//! Transient status messages.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cart::CartError;
use super::price::Price;

/// Notification severity.
///
/// Selects the icon and styling only; every kind behaves the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Font Awesome icon name (without the `fa-` prefix).
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Warning => "exclamation-triangle",
            Self::Error => "times-circle",
        }
    }

    /// CSS class applied next to `notification`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("invalid notification kind: {s}")),
        }
    }
}

/// A message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Warning)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    /// Shown after a product was added.
    #[must_use]
    pub fn item_added(name: &str) -> Self {
        Self::success(format!("{name} added to cart!"))
    }

    /// Shown after a product was removed.
    #[must_use]
    pub fn item_removed(name: &str) -> Self {
        Self::warning(format!("{name} removed from cart"))
    }

    /// Shown after a successful checkout.
    #[must_use]
    pub fn order_placed(total: Price) -> Self {
        Self::success(format!(
            "Thank you for your order! Total: {total}. We will contact you soon for delivery details."
        ))
    }

    /// Shown after the contact form was submitted.
    #[must_use]
    pub fn message_received() -> Self {
        Self::success("Thank you for your message! We will contact you soon.")
    }
}

impl From<&CartError> for Notification {
    fn from(err: &CartError) -> Self {
        match err {
            CartError::EmptyCart => Self::error(err.to_string()),
            CartError::OutOfRange { .. } => Self::error("That item is no longer in your cart"),
        }
    }
}
