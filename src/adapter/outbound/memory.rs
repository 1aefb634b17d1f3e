//! In-memory stores.
//!
//! Used when the database path is `:memory:` and by tests. State lives for
//! the lifetime of the process.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::id::{NotificationId, OpportunityId, UserId};
use crate::domain::notification::{NewNotification, NotificationRecord, NotificationStatus};
use crate::domain::opportunity::{Opportunity, OpportunityKey};
use crate::domain::preference::UserNotificationPreference;
use crate::error::{Error, Result};
use crate::port::outbound::store::{NotificationStore, OpportunityStore, UserDirectory};

/// In-memory [`OpportunityStore`].
///
/// [`fail_writes`](Self::fail_writes) makes the next writes fail so callers
/// can exercise rollback handling.
#[derive(Debug, Default)]
pub struct MemoryOpportunityStore {
    rows: RwLock<Vec<Opportunity>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryOpportunityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored opportunity, active or not, in insertion order.
    pub fn all(&self) -> Vec<Opportunity> {
        self.rows.read().clone()
    }
}

impl OpportunityStore for MemoryOpportunityStore {
    fn find_recent_active(
        &self,
        key: &OpportunityKey,
        since: DateTime<Utc>,
    ) -> Result<Option<Opportunity>> {
        Ok(self
            .rows
            .read()
            .iter()
            .rev()
            .find(|o| o.is_active() && &o.key() == key && o.detected_at() >= since)
            .cloned())
    }

    fn supersede_and_insert(&self, batch: &[Opportunity]) -> Result<Vec<Opportunity>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("writes disabled".into()));
        }

        let mut rows = self.rows.write();
        for row in rows.iter_mut() {
            if row.is_active() {
                *row = row.clone().with_active(false);
            }
        }

        let stored: Vec<Opportunity> = batch
            .iter()
            .map(|o| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                o.clone().with_id(OpportunityId::new(id)).with_active(true)
            })
            .collect();
        rows.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn list_active(&self, limit: usize) -> Result<Vec<Opportunity>> {
        let mut active: Vec<Opportunity> = self
            .rows
            .read()
            .iter()
            .filter(|o| o.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.net_profit_percent().cmp(&a.net_profit_percent()));
        active.truncate(limit);
        Ok(active)
    }
}

/// In-memory [`NotificationStore`].
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    records: RwLock<Vec<NotificationRecord>>,
    next_id: AtomicI64,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in creation order.
    pub fn all(&self) -> Vec<NotificationRecord> {
        self.records.read().clone()
    }

    fn update(&self, id: NotificationId, apply: impl FnOnce(&mut NotificationRecord)) -> Result<()> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::Database(format!("notification {} not found", id.value())))?;
        apply(record);
        Ok(())
    }
}

impl NotificationStore for MemoryNotificationStore {
    fn create_pending(&self, notification: &NewNotification) -> Result<NotificationId> {
        let id = NotificationId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records.write().push(NotificationRecord {
            id,
            user_id: notification.user_id.clone(),
            opportunity_id: notification.opportunity_id,
            kind: notification.kind,
            channel: notification.channel,
            title: notification.title.clone(),
            message: notification.message.clone(),
            payload: notification.payload.clone(),
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
            read_at: None,
            error_message: None,
        });
        Ok(id)
    }

    fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> Result<()> {
        self.update(id, |r| {
            r.status = NotificationStatus::Sent;
            r.sent_at = Some(at);
            r.error_message = None;
        })
    }

    fn mark_failed(&self, id: NotificationId, error: &str) -> Result<()> {
        self.update(id, |r| {
            r.status = NotificationStatus::Failed;
            r.error_message = Some(error.to_string());
        })
    }

    fn mark_read(&self, id: NotificationId, user_id: &UserId, at: DateTime<Utc>) -> Result<bool> {
        let mut records = self.records.write();
        let Some(record) = records.iter_mut().find(|r| {
            r.id == id && &r.user_id == user_id && r.status == NotificationStatus::Sent
        }) else {
            return Ok(false);
        };
        record.status = NotificationStatus::Read;
        record.read_at = Some(at);
        Ok(true)
    }

    fn count_delivered_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let count = self
            .records
            .read()
            .iter()
            .filter(|r| &r.user_id == user_id && r.created_at >= since)
            .filter(|r| matches!(r.status, NotificationStatus::Sent | NotificationStatus::Read))
            .count();
        Ok(count as u64)
    }

    fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .rev()
            .filter(|r| &r.user_id == user_id)
            .filter(|r| !unread_only || r.status == NotificationStatus::Sent)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// In-memory [`UserDirectory`]. Users are listed in id order.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<BTreeMap<UserId, (bool, UserNotificationPreference)>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserNotificationPreference>) -> Self {
        let directory = Self::new();
        {
            let mut map = directory.users.write();
            for prefs in users {
                map.insert(prefs.user_id.clone(), (true, prefs));
            }
        }
        directory
    }

    pub fn deactivate(&self, user_id: &UserId) {
        if let Some(entry) = self.users.write().get_mut(user_id) {
            entry.0 = false;
        }
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn active_users(&self) -> Result<Vec<UserNotificationPreference>> {
        Ok(self
            .users
            .read()
            .values()
            .filter(|(active, _)| *active)
            .map(|(_, prefs)| prefs.clone())
            .collect())
    }

    fn preferences(&self, user_id: &UserId) -> Result<Option<UserNotificationPreference>> {
        Ok(self.users.read().get(user_id).map(|(_, prefs)| prefs.clone()))
    }

    fn upsert(&self, preferences: &UserNotificationPreference) -> Result<()> {
        self.users
            .write()
            .insert(preferences.user_id.clone(), (true, preferences.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{Channel, NotificationType};
    use crate::testkit::domain::opportunity;
    use rust_decimal_macros::dec;

    #[test]
    fn supersede_deactivates_previous_batch() {
        let store = MemoryOpportunityStore::new();
        let first = store
            .supersede_and_insert(&[opportunity("bitcoin", "a", "b", dec!(100), dec!(106))])
            .unwrap();
        let second = store
            .supersede_and_insert(&[opportunity("ethereum", "a", "b", dec!(50), dec!(55))])
            .unwrap();

        assert_eq!(first[0].id(), Some(OpportunityId::new(1)));
        assert_eq!(second[0].id(), Some(OpportunityId::new(2)));
        let active = store.list_active(10).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].asset_id().as_str(), "ethereum");
    }

    #[test]
    fn failed_write_leaves_active_set() {
        let store = MemoryOpportunityStore::new();
        store
            .supersede_and_insert(&[opportunity("bitcoin", "a", "b", dec!(100), dec!(106))])
            .unwrap();
        store.fail_writes(true);

        assert!(store
            .supersede_and_insert(&[opportunity("ethereum", "a", "b", dec!(50), dec!(55))])
            .is_err());
        assert_eq!(store.list_active(10).unwrap().len(), 1);
    }

    #[test]
    fn only_sent_records_can_be_read() {
        let store = MemoryNotificationStore::new();
        let user = UserId::new("u1");
        let note = NewNotification {
            user_id: user.clone(),
            opportunity_id: None,
            kind: NotificationType::SystemUpdate,
            channel: Channel::InApp,
            title: "t".into(),
            message: "m".into(),
            payload: serde_json::Value::Null,
        };
        let id = store.create_pending(&note).unwrap();

        assert!(!store.mark_read(id, &user, Utc::now()).unwrap());
        store.mark_sent(id, Utc::now()).unwrap();
        assert!(!store.mark_read(id, &UserId::new("u2"), Utc::now()).unwrap());
        assert!(store.mark_read(id, &user, Utc::now()).unwrap());
        assert_eq!(store.count_delivered_since(&user, Utc::now() - chrono::Duration::hours(1)).unwrap(), 1);
        assert!(store.list_for_user(&user, true, 10).unwrap().is_empty());
    }
}
