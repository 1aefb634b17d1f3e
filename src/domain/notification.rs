//! Notification channels, types and delivery records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{NotificationId, OpportunityId, UserId};

/// Delivery channel.
///
/// Variant order is the order the dispatcher attempts channels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    InApp,
    Email,
    Telegram,
    Whatsapp,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::InApp,
        Channel::Email,
        Channel::Telegram,
        Channel::Whatsapp,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Telegram => "telegram",
            Self::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::UnknownChannel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ArbitrageOpportunity,
    PriceAlert,
    SystemUpdate,
    ScannerStatus,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [
        NotificationType::ArbitrageOpportunity,
        NotificationType::PriceAlert,
        NotificationType::SystemUpdate,
        NotificationType::ScannerStatus,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArbitrageOpportunity => "arbitrage_opportunity",
            Self::PriceAlert => "price_alert",
            Self::SystemUpdate => "system_update",
            Self::ScannerStatus => "scanner_status",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownNotificationType(s.to_string()))
    }
}

/// Lifecycle: `Pending -> Sent | Failed`, then `Sent -> Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
    Read,
}

impl NotificationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Read => "read",
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "read" => Ok(Self::Read),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Content of one notification before it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub opportunity_id: Option<OpportunityId>,
    pub kind: NotificationType,
    pub channel: Channel,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
}

/// One delivery attempt of one notification on one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub user_id: UserId,
    pub opportunity_id: Option<OpportunityId>,
    pub kind: NotificationType,
    pub channel: Channel,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl NotificationRecord {
    /// Delivered and not yet read.
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Sent
    }
}
