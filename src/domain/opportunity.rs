//! Cross-exchange arbitrage opportunity.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{AssetId, ExchangeId, OpportunityId};
use super::profit::ProfitBreakdown;

/// An active opportunity with the same key seen within this window
/// suppresses a new one.
pub const DEDUP_WINDOW: Duration = Duration::hours(1);

/// Identity used for deduplication: one asset bought on one exchange and
/// sold on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpportunityKey {
    pub asset_id: AssetId,
    pub buy_exchange_id: ExchangeId,
    pub sell_exchange_id: ExchangeId,
}

/// Buy `asset` on `buy_exchange`, sell it on `sell_exchange`.
///
/// Construction enforces `sell_price > buy_price > 0`, distinct exchanges
/// and non-negative tier profits. The `id` is assigned when the
/// opportunity is stored; `active` is the only field mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    id: Option<OpportunityId>,
    asset_id: AssetId,
    asset_symbol: String,
    buy_exchange_id: ExchangeId,
    sell_exchange_id: ExchangeId,
    buy_price: Decimal,
    sell_price: Decimal,
    profit: ProfitBreakdown,
    detected_at: DateTime<Utc>,
    active: bool,
}

impl Opportunity {
    /// Build a new, not yet stored, active opportunity.
    ///
    /// # Errors
    /// Returns a [`DomainError`] if any invariant is violated.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        asset_id: AssetId,
        asset_symbol: impl Into<String>,
        buy_exchange_id: ExchangeId,
        sell_exchange_id: ExchangeId,
        buy_price: Decimal,
        sell_price: Decimal,
        profit: ProfitBreakdown,
        detected_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if buy_price <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { price: buy_price });
        }
        if sell_price <= buy_price {
            return Err(DomainError::SellNotAboveBuy {
                buy: buy_price,
                sell: sell_price,
            });
        }
        if buy_exchange_id == sell_exchange_id {
            return Err(DomainError::SameExchange {
                exchange: buy_exchange_id.to_string(),
            });
        }
        if let Some((investment, profit)) = profit
            .tier_profits
            .iter()
            .find(|(_, profit)| *profit < Decimal::ZERO)
        {
            return Err(DomainError::NegativeTierProfit { investment, profit });
        }

        Ok(Self {
            id: None,
            asset_id,
            asset_symbol: asset_symbol.into(),
            buy_exchange_id,
            sell_exchange_id,
            buy_price,
            sell_price,
            profit,
            detected_at,
            active: true,
        })
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn with_id(mut self, id: OpportunityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<OpportunityId> {
        self.id
    }

    #[must_use]
    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    #[must_use]
    pub fn asset_symbol(&self) -> &str {
        &self.asset_symbol
    }

    #[must_use]
    pub fn buy_exchange_id(&self) -> &ExchangeId {
        &self.buy_exchange_id
    }

    #[must_use]
    pub fn sell_exchange_id(&self) -> &ExchangeId {
        &self.sell_exchange_id
    }

    #[must_use]
    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    #[must_use]
    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    #[must_use]
    pub fn profit(&self) -> &ProfitBreakdown {
        &self.profit
    }

    #[must_use]
    pub fn net_profit_percent(&self) -> Decimal {
        self.profit.net_profit_percent
    }

    #[must_use]
    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn key(&self) -> OpportunityKey {
        OpportunityKey {
            asset_id: self.asset_id.clone(),
            buy_exchange_id: self.buy_exchange_id.clone(),
            sell_exchange_id: self.sell_exchange_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profit::compute;
    use rust_decimal_macros::dec;

    fn build(buy: &str, sell: &str, buy_price: Decimal, sell_price: Decimal) -> Result<Opportunity, DomainError> {
        Opportunity::try_new(
            AssetId::new("bitcoin"),
            "BTC",
            ExchangeId::new(buy),
            ExchangeId::new(sell),
            buy_price,
            sell_price,
            compute(buy_price, sell_price, dec!(0.001), dec!(0.001), dec!(0.002)).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn valid_opportunity_starts_active_without_id() {
        let opp = build("a", "b", dec!(100), dec!(106)).unwrap();
        assert!(opp.is_active());
        assert!(opp.id().is_none());
        assert_eq!(opp.net_profit_percent(), dec!(6));
    }

    #[test]
    fn rejects_same_exchange() {
        let err = build("a", "a", dec!(100), dec!(106)).unwrap_err();
        assert!(matches!(err, DomainError::SameExchange { .. }));
    }

    #[test]
    fn rejects_sell_not_above_buy() {
        let err = build("a", "b", dec!(100), dec!(100)).unwrap_err();
        assert!(matches!(err, DomainError::SellNotAboveBuy { .. }));
    }

    #[test]
    fn key_ignores_prices_but_not_direction() {
        let first = build("a", "b", dec!(100), dec!(106)).unwrap();
        let second = build("a", "b", dec!(100), dec!(107)).unwrap();
        assert_eq!(second.key(), first.key());

        let reversed = build("b", "a", dec!(100), dec!(106)).unwrap();
        assert_ne!(reversed.key(), first.key());
    }
}
