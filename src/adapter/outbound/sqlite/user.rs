//! SQLite user directory.

use chrono::Utc;
use diesel::prelude::*;

use super::codec::format_time;
use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::UserRow;
use crate::adapter::outbound::sqlite::database::schema::users;
use crate::domain::id::UserId;
use crate::domain::preference::UserNotificationPreference;
use crate::error::{Error, Result};
use crate::port::outbound::store::UserDirectory;

/// SQLite-backed [`UserDirectory`]. Preferences are stored as JSON.
pub struct SqliteUserDirectory {
    pool: DbPool,
}

impl SqliteUserDirectory {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn from_row(row: UserRow) -> Result<UserNotificationPreference> {
        let mut preferences: UserNotificationPreference = serde_json::from_str(&row.preferences)?;
        preferences.user_id = UserId::from(row.id);
        preferences.tier = row.tier;
        Ok(preferences)
    }

    /// Deactivate a user without deleting their preferences.
    ///
    /// # Errors
    /// Returns an error on database failure.
    pub fn deactivate(&self, user_id: &UserId) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let updated = diesel::update(users::table.find(user_id.as_str()))
            .set(users::is_active.eq(false))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated > 0)
    }
}

impl UserDirectory for SqliteUserDirectory {
    fn active_users(&self) -> Result<Vec<UserNotificationPreference>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let rows: Vec<UserRow> = users::table
            .filter(users::is_active.eq(true))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(Self::from_row).collect()
    }

    fn preferences(&self, user_id: &UserId) -> Result<Option<UserNotificationPreference>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let row: Option<UserRow> = users::table
            .find(user_id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        row.map(Self::from_row).transpose()
    }

    fn upsert(&self, preferences: &UserNotificationPreference) -> Result<()> {
        let row = UserRow {
            id: preferences.user_id.to_string(),
            tier: preferences.tier.clone(),
            is_active: true,
            preferences: serde_json::to_string(preferences)?,
            updated_at: format_time(Utc::now()),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        diesel::replace_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}
