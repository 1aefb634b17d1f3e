//! Persistence ports.
//!
//! Stores are synchronous: the SQLite adapter runs on a pooled blocking
//! connection and callers hold no locks across awaits.

use chrono::{DateTime, Utc};

use crate::domain::id::{NotificationId, UserId};
use crate::domain::notification::{NewNotification, NotificationRecord};
use crate::domain::opportunity::{Opportunity, OpportunityKey};
use crate::domain::preference::UserNotificationPreference;
use crate::error::Result;

/// Storage for detected opportunities.
pub trait OpportunityStore: Send + Sync {
    /// Most recent active opportunity for `key` detected at or after
    /// `since`.
    fn find_recent_active(
        &self,
        key: &OpportunityKey,
        since: DateTime<Utc>,
    ) -> Result<Option<Opportunity>>;

    /// Atomically mark every active opportunity inactive and insert
    /// `batch` as the new active set.
    ///
    /// Returns the inserted opportunities with their assigned ids. On
    /// error nothing is changed.
    fn supersede_and_insert(&self, batch: &[Opportunity]) -> Result<Vec<Opportunity>>;

    /// Active opportunities, best net profit first.
    fn list_active(&self, limit: usize) -> Result<Vec<Opportunity>>;
}

/// Storage for notification delivery records.
pub trait NotificationStore: Send + Sync {
    /// Insert a record in `pending` status.
    fn create_pending(&self, notification: &NewNotification) -> Result<NotificationId>;

    fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> Result<()>;

    fn mark_failed(&self, id: NotificationId, error: &str) -> Result<()>;

    /// Mark a sent record read. Returns false when no sent record with
    /// that id belongs to `user_id`.
    fn mark_read(&self, id: NotificationId, user_id: &UserId, at: DateTime<Utc>) -> Result<bool>;

    /// Number of successfully delivered records for `user_id` created at
    /// or after `since`.
    fn count_delivered_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64>;

    /// Newest first.
    fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>>;
}

/// Read access to subscribed users and their preferences.
pub trait UserDirectory: Send + Sync {
    fn active_users(&self) -> Result<Vec<UserNotificationPreference>>;

    fn preferences(&self, user_id: &UserId) -> Result<Option<UserNotificationPreference>>;

    /// Insert or replace a user's preferences and mark the user active.
    fn upsert(&self, preferences: &UserNotificationPreference) -> Result<()>;
}
