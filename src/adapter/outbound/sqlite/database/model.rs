//! Database model types for Diesel ORM.
//!
//! Decimals are stored as text to keep them exact; timestamps as RFC 3339
//! text; structured values as JSON text.

use diesel::prelude::*;

use super::schema::{notifications, opportunities, users};

/// Database row for an opportunity (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = opportunities)]
pub struct NewOpportunityRow {
    pub asset_id: String,
    pub asset_symbol: String,
    pub buy_exchange_id: String,
    pub sell_exchange_id: String,
    pub buy_price: String,
    pub sell_price: String,
    pub buy_fee_rate: String,
    pub sell_fee_rate: String,
    pub slippage_rate: String,
    pub buy_fee: String,
    pub sell_fee: String,
    pub buy_slippage: String,
    pub sell_slippage: String,
    pub raw_price_difference: String,
    pub raw_spread_percent: String,
    pub net_profit_percent: String,
    pub profit_on_500: String,
    pub profit_on_1000: String,
    pub profit_on_5000: String,
    pub profit_on_10000: String,
    pub minimum_investment: String,
    pub detected_at: String,
    pub is_active: bool,
}

/// Database row for an opportunity (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = opportunities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OpportunityRow {
    pub id: i64,
    pub asset_id: String,
    pub asset_symbol: String,
    pub buy_exchange_id: String,
    pub sell_exchange_id: String,
    pub buy_price: String,
    pub sell_price: String,
    pub buy_fee_rate: String,
    pub sell_fee_rate: String,
    pub slippage_rate: String,
    pub buy_fee: String,
    pub sell_fee: String,
    pub buy_slippage: String,
    pub sell_slippage: String,
    pub raw_price_difference: String,
    pub raw_spread_percent: String,
    pub net_profit_percent: String,
    pub profit_on_500: String,
    pub profit_on_1000: String,
    pub profit_on_5000: String,
    pub profit_on_10000: String,
    pub minimum_investment: String,
    pub detected_at: String,
    pub is_active: bool,
}

/// Database row for a user and their serialized preferences.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub tier: String,
    pub is_active: bool,
    pub preferences: String,
    pub updated_at: String,
}

/// Database row for a notification (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub user_id: String,
    pub opportunity_id: Option<i64>,
    pub notification_type: String,
    pub channel: String,
    pub title: String,
    pub message: String,
    pub payload: String,
    pub status: String,
    pub created_at: String,
}

/// Database row for a notification (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationRow {
    pub id: i64,
    pub user_id: String,
    pub opportunity_id: Option<i64>,
    pub notification_type: String,
    pub channel: String,
    pub title: String,
    pub message: String,
    pub payload: String,
    pub status: String,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub read_at: Option<String>,
    pub error_message: Option<String>,
}

/// Result of `SELECT last_insert_rowid() AS id`.
#[derive(QueryableByName, Debug)]
pub struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    #[diesel(column_name = "id")]
    pub id: i64,
}

/// Result of a `COUNT(*) AS count` query.
#[derive(QueryableByName, Debug)]
pub struct RowCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}
