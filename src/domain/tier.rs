//! Subscription tiers and the limits they impose on users.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::notification::Channel;

/// Name of the tier unknown tier names fall back to.
pub const FREE_TIER: &str = "free";

/// Limits attached to a subscription tier.
///
/// `None` limits are unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTier {
    pub name: String,
    #[serde(default)]
    pub max_exchanges: Option<usize>,
    #[serde(default)]
    pub max_assets: Option<usize>,
    pub notification_channels: BTreeSet<Channel>,
    #[serde(default)]
    pub scans_per_day: Option<u32>,
}

impl SubscriptionTier {
    #[must_use]
    pub fn free() -> Self {
        Self {
            name: FREE_TIER.into(),
            max_exchanges: Some(2),
            max_assets: Some(10),
            notification_channels: [Channel::InApp].into_iter().collect(),
            scans_per_day: Some(24),
        }
    }

    #[must_use]
    pub fn pro() -> Self {
        Self {
            name: "pro".into(),
            max_exchanges: Some(5),
            max_assets: Some(25),
            notification_channels: [Channel::InApp, Channel::Email, Channel::Telegram]
                .into_iter()
                .collect(),
            scans_per_day: Some(288),
        }
    }

    #[must_use]
    pub fn enterprise() -> Self {
        Self {
            name: "enterprise".into(),
            max_exchanges: None,
            max_assets: None,
            notification_channels: Channel::ALL.into_iter().collect(),
            scans_per_day: None,
        }
    }

    #[must_use]
    pub fn allows_channel(&self, channel: Channel) -> bool {
        self.notification_channels.contains(&channel)
    }
}

/// Tier lookup by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: BTreeMap<String, SubscriptionTier>,
    fallback: SubscriptionTier,
}

impl TierTable {
    /// Build a table; a missing `free` entry is filled with the built-in
    /// free tier.
    #[must_use]
    pub fn new(tiers: impl IntoIterator<Item = SubscriptionTier>) -> Self {
        let tiers: BTreeMap<_, _> = tiers.into_iter().map(|t| (t.name.clone(), t)).collect();
        let fallback = tiers
            .get(FREE_TIER)
            .cloned()
            .unwrap_or_else(SubscriptionTier::free);
        Self { tiers, fallback }
    }

    /// Tier by name, falling back to `free` for unknown names.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &SubscriptionTier {
        self.tiers.get(name).unwrap_or(&self.fallback)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionTier> {
        self.tiers.values()
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new([
            SubscriptionTier::free(),
            SubscriptionTier::pro(),
            SubscriptionTier::enterprise(),
        ])
    }
}
