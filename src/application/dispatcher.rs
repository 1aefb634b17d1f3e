//! Multi-channel notification dispatch.
//!
//! One call fans a notification out to every channel the user can receive
//! on. Each attempt is recorded as its own notification record: pending
//! first, then sent or failed. A failing channel never blocks the others.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::message::render_opportunity;
use crate::domain::id::{NotificationId, OpportunityId, UserId};
use crate::domain::notification::{Channel, NewNotification, NotificationRecord, NotificationType};
use crate::domain::opportunity::Opportunity;
use crate::domain::tier::TierTable;
use crate::error::Result;
use crate::port::outbound::channel::{ChannelSender, RenderedNotification};
use crate::port::outbound::store::{NotificationStore, UserDirectory};

/// Window the per-user hourly cap is counted over.
const RATE_WINDOW: Duration = Duration::hours(1);

/// Per-channel outcome of one dispatch. Only attempted channels appear.
pub type DeliveryReport = BTreeMap<Channel, bool>;

/// Senders keyed by the channel they deliver on.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    senders: HashMap<Channel, Arc<dyn ChannelSender>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender` under its own channel, replacing any previous one.
    pub fn register(&mut self, sender: Arc<dyn ChannelSender>) {
        let channel = sender.channel();
        if self.senders.insert(channel, sender).is_some() {
            warn!(channel = channel.as_str(), "Replaced existing channel sender");
        }
    }

    #[must_use]
    pub fn with(mut self, sender: Arc<dyn ChannelSender>) -> Self {
        self.register(sender);
        self
    }

    pub fn get(&self, channel: Channel) -> Option<&Arc<dyn ChannelSender>> {
        self.senders.get(&channel)
    }

    /// Registered channels in dispatch order.
    pub fn channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| self.senders.contains_key(c))
            .collect()
    }
}

/// Routes notifications to users through their enabled channels.
pub struct NotificationDispatcher {
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn NotificationStore>,
    registry: ChannelRegistry,
    tiers: TierTable,
}

impl NotificationDispatcher {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn NotificationStore>,
        registry: ChannelRegistry,
        tiers: TierTable,
    ) -> Self {
        Self {
            users,
            store,
            registry,
            tiers,
        }
    }

    pub const fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Deliver a notification to `user_id` on every eligible channel.
    ///
    /// Returns an empty report when the user has no preferences, has the
    /// type disabled, is below their profit threshold, is inside quiet
    /// hours or has reached the hourly cap.
    ///
    /// # Errors
    /// Only preference or rate-count lookups fail the call. Delivery and
    /// record-keeping failures are logged and reported per channel.
    pub async fn send(
        &self,
        user_id: &UserId,
        kind: NotificationType,
        title: &str,
        message: &str,
        payload: Value,
    ) -> Result<DeliveryReport> {
        let content = RenderedNotification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            payload,
        };
        self.deliver(user_id, &content, None).await
    }

    /// Render and deliver an arbitrage alert for `opportunity`.
    ///
    /// # Errors
    /// Same as [`send`](Self::send).
    pub async fn send_opportunity(
        &self,
        user_id: &UserId,
        opportunity: &Opportunity,
        total_matches: usize,
    ) -> Result<DeliveryReport> {
        let content = render_opportunity(opportunity, total_matches);
        self.deliver(user_id, &content, opportunity.id()).await
    }

    /// Mark an in-app notification read.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn mark_read(&self, id: NotificationId, user_id: &UserId) -> Result<bool> {
        self.store.mark_read(id, user_id, Utc::now())
    }

    /// Delivered but unread notifications, newest first.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn unread(&self, user_id: &UserId, limit: usize) -> Result<Vec<NotificationRecord>> {
        self.store.list_for_user(user_id, true, limit)
    }

    async fn deliver(
        &self,
        user_id: &UserId,
        content: &RenderedNotification,
        opportunity_id: Option<OpportunityId>,
    ) -> Result<DeliveryReport> {
        let mut report = DeliveryReport::new();

        let Some(prefs) = self.users.preferences(user_id)? else {
            debug!(user = %user_id, "No notification preferences, skipping");
            return Ok(report);
        };

        if !prefs.allows_type(content.kind) {
            debug!(user = %user_id, kind = content.kind.as_str(), "Notification type disabled");
            return Ok(report);
        }

        // Payloads without a numeric profit_percent skip the threshold check.
        let profit = content.payload.get("profit_percent").and_then(Value::as_f64);
        if let (NotificationType::ArbitrageOpportunity, Some(profit)) = (content.kind, profit) {
            let threshold = prefs.min_profit_threshold.to_f64().unwrap_or(0.0);
            if profit < threshold {
                debug!(user = %user_id, profit, threshold, "Below profit threshold");
                return Ok(report);
            }
        }

        let now = Utc::now();
        if prefs.is_quiet_at(now) {
            debug!(user = %user_id, "Inside quiet hours");
            return Ok(report);
        }

        let recent = self.store.count_delivered_since(user_id, now - RATE_WINDOW)?;
        if recent >= u64::from(prefs.max_notifications_per_hour) {
            info!(
                user = %user_id,
                recent,
                limit = prefs.max_notifications_per_hour,
                "Hourly notification cap reached"
            );
            return Ok(report);
        }

        let tier = self.tiers.resolve(&prefs.tier);

        for channel in Channel::ALL {
            let Some(destination) = prefs.destination(channel) else {
                continue;
            };
            if !tier.allows_channel(channel) {
                debug!(user = %user_id, channel = channel.as_str(), tier = %tier.name, "Channel not in tier");
                continue;
            }
            let Some(sender) = self.registry.get(channel) else {
                debug!(channel = channel.as_str(), "No sender registered");
                continue;
            };

            let delivered = self
                .attempt(user_id, channel, sender.as_ref(), &destination, content, opportunity_id)
                .await;
            report.insert(channel, delivered);
        }

        info!(
            user = %user_id,
            kind = content.kind.as_str(),
            attempted = report.len(),
            delivered = report.values().filter(|ok| **ok).count(),
            "Notification dispatched"
        );
        Ok(report)
    }

    async fn attempt(
        &self,
        user_id: &UserId,
        channel: Channel,
        sender: &dyn ChannelSender,
        destination: &str,
        content: &RenderedNotification,
        opportunity_id: Option<OpportunityId>,
    ) -> bool {
        let record = NewNotification {
            user_id: user_id.clone(),
            opportunity_id,
            kind: content.kind,
            channel,
            title: content.title.clone(),
            message: content.message.clone(),
            payload: content.payload.clone(),
        };
        let id = match self.store.create_pending(&record) {
            Ok(id) => id,
            Err(e) => {
                error!(user = %user_id, channel = channel.as_str(), error = %e, "Failed to record notification");
                return false;
            }
        };

        let outcome = sender.send(destination, content).await;
        let (delivered, failure) = match outcome {
            Ok(true) => (true, None),
            Ok(false) => (false, Some("channel declined delivery".to_string())),
            Err(e) => (false, Some(e.to_string())),
        };

        let update = match &failure {
            None => self.store.mark_sent(id, Utc::now()),
            Some(reason) => {
                warn!(user = %user_id, channel = channel.as_str(), error = %reason, "Delivery failed");
                self.store.mark_failed(id, reason)
            }
        };
        if let Err(e) = update {
            error!(notification = id.value(), error = %e, "Failed to update notification status");
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{MemoryNotificationStore, MemoryUserDirectory};
    use crate::domain::notification::NotificationStatus;
    use crate::domain::preference::{QuietHours, UserNotificationPreference};
    use crate::testkit::channel::RecordingSender;
    use serde_json::json;

    struct Fixture {
        store: Arc<MemoryNotificationStore>,
        in_app: Arc<RecordingSender>,
        email: Arc<RecordingSender>,
        dispatcher: NotificationDispatcher,
    }

    fn pro_user_with_email() -> UserNotificationPreference {
        let mut prefs = UserNotificationPreference::new("u1");
        prefs.tier = "pro".into();
        prefs.channels.insert(Channel::Email);
        prefs.contacts.email_address = Some("u1@example.com".into());
        prefs
    }

    fn fixture(prefs: Vec<UserNotificationPreference>, email: RecordingSender) -> Fixture {
        let store = Arc::new(MemoryNotificationStore::new());
        let in_app = Arc::new(RecordingSender::delivering(Channel::InApp));
        let email = Arc::new(email);
        let registry = ChannelRegistry::new()
            .with(in_app.clone())
            .with(email.clone());
        let dispatcher = NotificationDispatcher::new(
            Arc::new(MemoryUserDirectory::with_users(prefs)),
            store.clone(),
            registry,
            TierTable::default(),
        );
        Fixture {
            store,
            in_app,
            email,
            dispatcher,
        }
    }

    fn arbitrage_payload(profit_percent: f64) -> Value {
        json!({"profit_percent": profit_percent})
    }

    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn partial_failure_records_both_outcomes() {
        let fx = fixture(
            vec![pro_user_with_email()],
            RecordingSender::failing(Channel::Email, "relay down"),
        );

        let report = fx
            .dispatcher
            .send(
                &UserId::new("u1"),
                NotificationType::ArbitrageOpportunity,
                "t",
                "m",
                arbitrage_payload(2.0),
            )
            .await
            .unwrap();

        assert_eq!(report, BTreeMap::from([(Channel::InApp, true), (Channel::Email, false)]));
        let records = fx.store.all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, NotificationStatus::Sent);
        assert_eq!(records[1].status, NotificationStatus::Failed);
        assert_eq!(records[1].error_message.as_deref(), Some("channel delivery error: relay down"));
    }

    #[tokio::test]
    async fn unknown_user_gets_nothing() {
        let fx = fixture(vec![], RecordingSender::delivering(Channel::Email));
        let report = fx
            .dispatcher
            .send(&UserId::new("ghost"), NotificationType::SystemUpdate, "t", "m", Value::Null)
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(fx.store.all().is_empty());
    }

    #[tokio::test]
    async fn disabled_type_and_low_profit_are_skipped() {
        let mut prefs = pro_user_with_email();
        prefs.types.remove(&NotificationType::PriceAlert);
        let fx = fixture(vec![prefs], RecordingSender::delivering(Channel::Email));
        let user = UserId::new("u1");

        let report = fx
            .dispatcher
            .send(&user, NotificationType::PriceAlert, "t", "m", Value::Null)
            .await
            .unwrap();
        assert!(report.is_empty());

        let report = fx
            .dispatcher
            .send(&user, NotificationType::ArbitrageOpportunity, "t", "m", arbitrage_payload(0.2))
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(fx.in_app.call_count(), 0);
    }

    #[tokio::test]
    async fn arbitrage_without_profit_percent_bypasses_threshold() {
        let fx = fixture(vec![pro_user_with_email()], RecordingSender::delivering(Channel::Email));

        let report = fx
            .dispatcher
            .send(
                &UserId::new("u1"),
                NotificationType::ArbitrageOpportunity,
                "t",
                "m",
                json!({"note": "manual"}),
            )
            .await
            .unwrap();

        assert_eq!(report, BTreeMap::from([(Channel::InApp, true), (Channel::Email, true)]));
        assert_eq!(fx.in_app.call_count(), 1);
    }

    #[tokio::test]
    async fn tier_allowlist_blocks_channels() {
        let mut prefs = pro_user_with_email();
        prefs.tier = "free".into();
        let fx = fixture(vec![prefs], RecordingSender::delivering(Channel::Email));

        let report = fx
            .dispatcher
            .send(&UserId::new("u1"), NotificationType::SystemUpdate, "t", "m", Value::Null)
            .await
            .unwrap();

        assert_eq!(report, BTreeMap::from([(Channel::InApp, true)]));
        assert_eq!(fx.email.call_count(), 0);
    }

    #[tokio::test]
    async fn quiet_hours_suppress_everything() {
        let mut prefs = pro_user_with_email();
        let now = Utc::now();
        prefs.quiet_hours = Some(QuietHours {
            start: (now - Duration::hours(1)).time(),
            end: (now + Duration::hours(1)).time(),
        });
        let fx = fixture(vec![prefs], RecordingSender::delivering(Channel::Email));

        let report = fx
            .dispatcher
            .send(&UserId::new("u1"), NotificationType::SystemUpdate, "t", "m", Value::Null)
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn hourly_cap_counts_delivered_records() {
        let mut prefs = UserNotificationPreference::new("u1");
        prefs.max_notifications_per_hour = 2;
        let fx = fixture(vec![prefs], RecordingSender::delivering(Channel::Email));
        let user = UserId::new("u1");

        for _ in 0..3 {
            fx.dispatcher
                .send(&user, NotificationType::SystemUpdate, "t", "m", Value::Null)
                .await
                .unwrap();
        }

        assert_eq!(fx.in_app.call_count(), 2);
    }

    #[tokio::test]
    async fn in_app_notifications_can_be_read() {
        let fx = fixture(vec![UserNotificationPreference::new("u1")], RecordingSender::delivering(Channel::Email));
        let user = UserId::new("u1");
        fx.dispatcher
            .send(&user, NotificationType::SystemUpdate, "hello", "m", Value::Null)
            .await
            .unwrap();

        let unread = fx.dispatcher.unread(&user, 10).unwrap();
        assert_eq!(unread.len(), 1);
        assert!(fx.dispatcher.mark_read(unread[0].id, &user).unwrap());
        assert!(fx.dispatcher.unread(&user, 10).unwrap().is_empty());
    }

    #[test]
    fn registry_lists_channels_in_dispatch_order() {
        let registry = ChannelRegistry::new()
            .with(Arc::new(RecordingSender::delivering(Channel::Whatsapp)))
            .with(Arc::new(RecordingSender::delivering(Channel::InApp)));
        assert_eq!(registry.channels(), vec![Channel::InApp, Channel::Whatsapp]);
    }
}
