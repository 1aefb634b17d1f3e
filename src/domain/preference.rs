//! Per-user notification preferences.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::id::{AssetId, ExchangeId, UserId};
use super::notification::{Channel, NotificationType};
use super::tier::FREE_TIER;

pub const DEFAULT_MIN_PROFIT_THRESHOLD: Decimal = dec!(0.5);
pub const DEFAULT_MAX_NOTIFICATIONS_PER_HOUR: u32 = 10;

/// Contact details for the external channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
}

/// Daily UTC window during which nothing is sent.
///
/// `start > end` wraps past midnight (e.g. 22:00 to 07:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            return false;
        }
        if self.start < self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// What a user wants to hear about, where, and how often.
///
/// Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotificationPreference {
    pub user_id: UserId,
    #[serde(default = "default_tier")]
    pub tier: String,
    #[serde(default = "default_channels")]
    pub channels: BTreeSet<Channel>,
    #[serde(default)]
    pub contacts: ContactDetails,
    #[serde(default = "default_types")]
    pub types: BTreeSet<NotificationType>,
    #[serde(default = "default_min_profit")]
    pub min_profit_threshold: Decimal,
    #[serde(default = "default_max_per_hour")]
    pub max_notifications_per_hour: u32,
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
    #[serde(default)]
    pub preferred_exchanges: Vec<ExchangeId>,
    #[serde(default)]
    pub preferred_assets: Vec<AssetId>,
}

fn default_tier() -> String {
    FREE_TIER.into()
}

fn default_channels() -> BTreeSet<Channel> {
    [Channel::InApp].into_iter().collect()
}

fn default_types() -> BTreeSet<NotificationType> {
    NotificationType::ALL.into_iter().collect()
}

const fn default_min_profit() -> Decimal {
    DEFAULT_MIN_PROFIT_THRESHOLD
}

const fn default_max_per_hour() -> u32 {
    DEFAULT_MAX_NOTIFICATIONS_PER_HOUR
}

impl UserNotificationPreference {
    /// Defaults: free tier, in-app only, every type enabled.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            tier: default_tier(),
            channels: default_channels(),
            contacts: ContactDetails::default(),
            types: default_types(),
            min_profit_threshold: DEFAULT_MIN_PROFIT_THRESHOLD,
            max_notifications_per_hour: DEFAULT_MAX_NOTIFICATIONS_PER_HOUR,
            quiet_hours: None,
            preferred_exchanges: Vec::new(),
            preferred_assets: Vec::new(),
        }
    }

    #[must_use]
    pub fn allows_type(&self, kind: NotificationType) -> bool {
        self.types.contains(&kind)
    }

    #[must_use]
    pub fn is_quiet_at(&self, now: DateTime<Utc>) -> bool {
        self.quiet_hours
            .is_some_and(|window| window.contains(now.time()))
    }

    /// Where to deliver on `channel`, if the channel is enabled and its
    /// contact detail is present.
    ///
    /// In-app delivery is addressed by user id.
    #[must_use]
    pub fn destination(&self, channel: Channel) -> Option<String> {
        if !self.channels.contains(&channel) {
            return None;
        }
        let detail = match channel {
            Channel::InApp => return Some(self.user_id.to_string()),
            Channel::Email => self.contacts.email_address.as_deref(),
            Channel::Telegram => self.contacts.telegram_chat_id.as_deref(),
            Channel::Whatsapp => self.contacts.whatsapp_number.as_deref(),
        };
        detail
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToOwned::to_owned)
    }
}
