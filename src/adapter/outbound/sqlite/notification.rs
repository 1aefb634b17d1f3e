//! SQLite notification record store.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::codec::{format_time, parse_optional_time, parse_time};
use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    LastInsertRowId, NewNotificationRow, NotificationRow,
};
use crate::adapter::outbound::sqlite::database::schema::notifications;
use crate::domain::id::{NotificationId, OpportunityId, UserId};
use crate::domain::notification::{NewNotification, NotificationRecord, NotificationStatus};
use crate::error::{Error, Result};
use crate::port::outbound::store::NotificationStore;

/// SQLite-backed [`NotificationStore`].
pub struct SqliteNotificationStore {
    pool: DbPool,
}

impl SqliteNotificationStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn from_row(row: NotificationRow) -> Result<NotificationRecord> {
        Ok(NotificationRecord {
            id: NotificationId::new(row.id),
            user_id: UserId::from(row.user_id),
            opportunity_id: row.opportunity_id.map(OpportunityId::new),
            kind: row.notification_type.parse()?,
            channel: row.channel.parse()?,
            title: row.title,
            message: row.message,
            payload: serde_json::from_str(&row.payload)?,
            status: row.status.parse()?,
            created_at: parse_time(&row.created_at)?,
            sent_at: parse_optional_time(row.sent_at.as_deref())?,
            read_at: parse_optional_time(row.read_at.as_deref())?,
            error_message: row.error_message,
        })
    }
}

impl NotificationStore for SqliteNotificationStore {
    fn create_pending(&self, notification: &NewNotification) -> Result<NotificationId> {
        let row = NewNotificationRow {
            user_id: notification.user_id.to_string(),
            opportunity_id: notification.opportunity_id.map(OpportunityId::value),
            notification_type: notification.kind.as_str().to_string(),
            channel: notification.channel.as_str().to_string(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            payload: serde_json::to_string(&notification.payload)?,
            status: NotificationStatus::Pending.as_str().to_string(),
            created_at: format_time(Utc::now()),
        };

        let mut conn = self.connection()?;
        let id = conn
            .transaction(|conn| {
                diesel::insert_into(notifications::table)
                    .values(&row)
                    .execute(conn)?;
                let id = diesel::sql_query("SELECT last_insert_rowid() AS id")
                    .get_result::<LastInsertRowId>(conn)?
                    .id;
                Ok::<i64, diesel::result::Error>(id)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(NotificationId::new(id))
    }

    fn mark_sent(&self, id: NotificationId, at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.connection()?;
        diesel::update(notifications::table.find(id.value()))
            .set((
                notifications::status.eq(NotificationStatus::Sent.as_str()),
                notifications::sent_at.eq(Some(format_time(at))),
                notifications::error_message.eq(None::<String>),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn mark_failed(&self, id: NotificationId, error: &str) -> Result<()> {
        let mut conn = self.connection()?;
        diesel::update(notifications::table.find(id.value()))
            .set((
                notifications::status.eq(NotificationStatus::Failed.as_str()),
                notifications::error_message.eq(Some(error)),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    fn mark_read(&self, id: NotificationId, user_id: &UserId, at: DateTime<Utc>) -> Result<bool> {
        let mut conn = self.connection()?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.value()))
                .filter(notifications::user_id.eq(user_id.as_str()))
                .filter(notifications::status.eq(NotificationStatus::Sent.as_str())),
        )
        .set((
            notifications::status.eq(NotificationStatus::Read.as_str()),
            notifications::read_at.eq(Some(format_time(at))),
        ))
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated > 0)
    }

    fn count_delivered_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64> {
        let mut conn = self.connection()?;
        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id.as_str()))
            .filter(notifications::created_at.ge(format_time(since)))
            .filter(notifications::status.eq_any([
                NotificationStatus::Sent.as_str(),
                NotificationStatus::Read.as_str(),
            ]))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn list_for_user(
        &self,
        user_id: &UserId,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<NotificationRecord>> {
        let mut conn = self.connection()?;
        let mut query = notifications::table
            .select(NotificationRow::as_select())
            .filter(notifications::user_id.eq(user_id.as_str()))
            .into_boxed();
        if unread_only {
            query = query.filter(notifications::status.eq(NotificationStatus::Sent.as_str()));
        }

        let rows: Vec<NotificationRow> = query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
