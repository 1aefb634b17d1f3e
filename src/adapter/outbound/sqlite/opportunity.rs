//! SQLite opportunity store.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::debug;

use super::codec::{format_time, parse_decimal, parse_time};
use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    LastInsertRowId, NewOpportunityRow, OpportunityRow,
};
use crate::adapter::outbound::sqlite::database::schema::opportunities;
use crate::domain::id::{AssetId, ExchangeId, OpportunityId};
use crate::domain::opportunity::{Opportunity, OpportunityKey};
use crate::domain::profit::{ProfitBreakdown, TierProfits};
use crate::error::{Error, Result};
use crate::port::outbound::store::OpportunityStore;

/// SQLite-backed [`OpportunityStore`].
pub struct SqliteOpportunityStore {
    pool: DbPool,
}

impl SqliteOpportunityStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(opportunity: &Opportunity) -> NewOpportunityRow {
        let profit = opportunity.profit();
        let tiers = profit.tier_profits;
        NewOpportunityRow {
            asset_id: opportunity.asset_id().to_string(),
            asset_symbol: opportunity.asset_symbol().to_string(),
            buy_exchange_id: opportunity.buy_exchange_id().to_string(),
            sell_exchange_id: opportunity.sell_exchange_id().to_string(),
            buy_price: opportunity.buy_price().to_string(),
            sell_price: opportunity.sell_price().to_string(),
            buy_fee_rate: profit.buy_fee_rate.to_string(),
            sell_fee_rate: profit.sell_fee_rate.to_string(),
            slippage_rate: profit.slippage_rate.to_string(),
            buy_fee: profit.buy_fee.to_string(),
            sell_fee: profit.sell_fee.to_string(),
            buy_slippage: profit.buy_slippage.to_string(),
            sell_slippage: profit.sell_slippage.to_string(),
            raw_price_difference: profit.raw_price_difference.to_string(),
            raw_spread_percent: profit.raw_spread_percent.to_string(),
            net_profit_percent: profit.net_profit_percent.to_string(),
            profit_on_500: tiers.on_500.to_string(),
            profit_on_1000: tiers.on_1000.to_string(),
            profit_on_5000: tiers.on_5000.to_string(),
            profit_on_10000: tiers.on_10000.to_string(),
            minimum_investment: profit.minimum_investment.to_string(),
            detected_at: format_time(opportunity.detected_at()),
            is_active: opportunity.is_active(),
        }
    }

    fn from_row(row: OpportunityRow) -> Result<Opportunity> {
        let profit = ProfitBreakdown {
            buy_fee_rate: parse_decimal("buy_fee_rate", &row.buy_fee_rate)?,
            sell_fee_rate: parse_decimal("sell_fee_rate", &row.sell_fee_rate)?,
            slippage_rate: parse_decimal("slippage_rate", &row.slippage_rate)?,
            buy_fee: parse_decimal("buy_fee", &row.buy_fee)?,
            sell_fee: parse_decimal("sell_fee", &row.sell_fee)?,
            buy_slippage: parse_decimal("buy_slippage", &row.buy_slippage)?,
            sell_slippage: parse_decimal("sell_slippage", &row.sell_slippage)?,
            raw_price_difference: parse_decimal("raw_price_difference", &row.raw_price_difference)?,
            raw_spread_percent: parse_decimal("raw_spread_percent", &row.raw_spread_percent)?,
            net_profit_percent: parse_decimal("net_profit_percent", &row.net_profit_percent)?,
            tier_profits: TierProfits {
                on_500: parse_decimal("profit_on_500", &row.profit_on_500)?,
                on_1000: parse_decimal("profit_on_1000", &row.profit_on_1000)?,
                on_5000: parse_decimal("profit_on_5000", &row.profit_on_5000)?,
                on_10000: parse_decimal("profit_on_10000", &row.profit_on_10000)?,
            },
            minimum_investment: parse_decimal("minimum_investment", &row.minimum_investment)?,
        };

        let opportunity = Opportunity::try_new(
            AssetId::from(row.asset_id),
            row.asset_symbol,
            ExchangeId::from(row.buy_exchange_id),
            ExchangeId::from(row.sell_exchange_id),
            parse_decimal("buy_price", &row.buy_price)?,
            parse_decimal("sell_price", &row.sell_price)?,
            profit,
            parse_time(&row.detected_at)?,
        )?;

        Ok(opportunity
            .with_id(OpportunityId::new(row.id))
            .with_active(row.is_active))
    }
}

impl OpportunityStore for SqliteOpportunityStore {
    fn find_recent_active(
        &self,
        key: &OpportunityKey,
        since: DateTime<Utc>,
    ) -> Result<Option<Opportunity>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<OpportunityRow> = opportunities::table
            .filter(opportunities::asset_id.eq(key.asset_id.as_str()))
            .filter(opportunities::buy_exchange_id.eq(key.buy_exchange_id.as_str()))
            .filter(opportunities::sell_exchange_id.eq(key.sell_exchange_id.as_str()))
            .filter(opportunities::is_active.eq(true))
            .filter(opportunities::detected_at.ge(format_time(since)))
            .order(opportunities::detected_at.desc())
            .select(OpportunityRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    fn supersede_and_insert(&self, batch: &[Opportunity]) -> Result<Vec<Opportunity>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<NewOpportunityRow> = batch.iter().map(Self::to_row).collect();
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let ids = conn
            .transaction(|conn| {
                let superseded = diesel::update(opportunities::table)
                    .filter(opportunities::is_active.eq(true))
                    .set(opportunities::is_active.eq(false))
                    .execute(conn)?;
                debug!(superseded, "Deactivated previous opportunities");

                let mut ids = Vec::with_capacity(rows.len());
                for row in &rows {
                    diesel::insert_into(opportunities::table)
                        .values(row)
                        .execute(conn)?;
                    let id = diesel::sql_query("SELECT last_insert_rowid() AS id")
                        .get_result::<LastInsertRowId>(conn)?
                        .id;
                    ids.push(id);
                }

                Ok::<Vec<i64>, diesel::result::Error>(ids)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(batch
            .iter()
            .zip(ids)
            .map(|(opportunity, id)| {
                opportunity
                    .clone()
                    .with_id(OpportunityId::new(id))
                    .with_active(true)
            })
            .collect())
    }

    fn list_active(&self, limit: usize) -> Result<Vec<Opportunity>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<OpportunityRow> = opportunities::table
            .filter(opportunities::is_active.eq(true))
            .select(OpportunityRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut active = rows
            .into_iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>>>()?;
        active.sort_by(|a, b| b.net_profit_percent().cmp(&a.net_profit_percent()));
        active.truncate(limit);
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use crate::domain::profit::compute;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn store() -> (tempfile::TempDir, SqliteOpportunityStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&dir.path().join("opps.db").display().to_string()).unwrap();
        run_migrations(&pool).unwrap();
        (dir, SqliteOpportunityStore::new(pool))
    }

    fn opportunity(asset: &str, buy: &str, sell: &str, sell_price: Decimal, at: DateTime<Utc>) -> Opportunity {
        Opportunity::try_new(
            AssetId::new(asset),
            asset.to_uppercase(),
            ExchangeId::new(buy),
            ExchangeId::new(sell),
            dec!(100),
            sell_price,
            compute(dec!(100), sell_price, dec!(0.001), dec!(0.001), dec!(0.002)).unwrap(),
            at,
        )
        .unwrap()
    }

    #[test]
    fn insert_assigns_ids_and_round_trips_decimals() {
        let (_dir, store) = store();
        let opp = opportunity("bitcoin", "a", "b", dec!(106.25), Utc::now());

        let stored = store.supersede_and_insert(std::slice::from_ref(&opp)).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].id().is_some());

        let active = store.list_active(10).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].sell_price(), dec!(106.25));
        assert_eq!(active[0].profit(), opp.profit());
    }

    #[test]
    fn new_batch_supersedes_previous_active_set() {
        let (_dir, store) = store();
        let now = Utc::now();
        store
            .supersede_and_insert(&[opportunity("bitcoin", "a", "b", dec!(106), now)])
            .unwrap();
        store
            .supersede_and_insert(&[opportunity("ethereum", "a", "b", dec!(107), now)])
            .unwrap();

        let active = store.list_active(10).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].asset_id().as_str(), "ethereum");
    }

    #[test]
    fn empty_batch_leaves_active_set_untouched() {
        let (_dir, store) = store();
        store
            .supersede_and_insert(&[opportunity("bitcoin", "a", "b", dec!(106), Utc::now())])
            .unwrap();
        assert!(store.supersede_and_insert(&[]).unwrap().is_empty());
        assert_eq!(store.list_active(10).unwrap().len(), 1);
    }

    #[test]
    fn find_recent_active_respects_window_and_key() {
        let (_dir, store) = store();
        let now = Utc::now();
        let opp = opportunity("bitcoin", "a", "b", dec!(106), now - chrono::Duration::minutes(10));
        store.supersede_and_insert(&[opp.clone()]).unwrap();

        let hour_ago = now - chrono::Duration::hours(1);
        assert!(store.find_recent_active(&opp.key(), hour_ago).unwrap().is_some());

        let five_min_ago = now - chrono::Duration::minutes(5);
        assert!(store.find_recent_active(&opp.key(), five_min_ago).unwrap().is_none());

        let reversed = opportunity("bitcoin", "b", "a", dec!(106), now);
        assert!(store.find_recent_active(&reversed.key(), hour_ago).unwrap().is_none());
    }

    #[test]
    fn list_active_orders_by_profit_and_limits() {
        let (_dir, store) = store();
        let now = Utc::now();
        store
            .supersede_and_insert(&[
                opportunity("bitcoin", "a", "b", dec!(106), now),
                opportunity("ethereum", "a", "b", dec!(110), now),
                opportunity("solana", "a", "b", dec!(108), now),
            ])
            .unwrap();

        let top = store.list_active(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].asset_id().as_str(), "ethereum");
        assert_eq!(top[1].asset_id().as_str(), "solana");
    }
}
