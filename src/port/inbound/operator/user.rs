//! User and inbox projections for operator-facing adapters.

use serde::Serialize;

use crate::domain::id::{NotificationId, UserId};
use crate::domain::notification::NotificationRecord;
use crate::domain::preference::UserNotificationPreference;
use crate::error::Result;

/// A user whose tier is not in the tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownTier {
    pub user_id: UserId,
    pub tier: String,
}

/// Output of `users import`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserImportReport {
    pub imported: usize,
    /// Users stored anyway; free-tier limits apply to them.
    pub unknown_tiers: Vec<UnknownTier>,
}

/// Input for `inbox`.
#[derive(Debug, Clone)]
pub struct InboxRequest {
    pub user_id: UserId,
    pub unread_only: bool,
    pub limit: usize,
    /// Mark this notification read before listing.
    pub mark_read: Option<NotificationId>,
}

/// Output of `inbox`.
#[derive(Debug, Clone, Serialize)]
pub struct InboxView {
    pub user_id: UserId,
    /// Whether `mark_read` matched an unread notification of this user.
    /// `None` when nothing was asked.
    pub marked: Option<bool>,
    pub notifications: Vec<NotificationRecord>,
}

impl InboxView {
    /// Listed notifications still waiting to be read.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.notifications
            .iter()
            .filter(|record| record.is_unread())
            .count()
    }
}

/// User-management use-cases for operator-facing adapters.
pub trait UserOperator: Send + Sync {
    /// Insert or replace user preferences.
    fn import_users(
        &self,
        config_toml: &str,
        users: Vec<UserNotificationPreference>,
    ) -> Result<UserImportReport>;

    /// All active users.
    fn list_users(&self, config_toml: &str) -> Result<Vec<UserNotificationPreference>>;

    /// A user's notifications, newest first.
    fn inbox(&self, config_toml: &str, request: &InboxRequest) -> Result<InboxView>;
}
