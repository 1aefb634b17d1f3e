//! Price observations from the market-data source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::{AssetId, ExchangeId};

/// Last-traded price of one asset on one exchange at one instant.
///
/// Ephemeral: produced by a price source, consumed by the detector, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    asset_id: AssetId,
    exchange_id: ExchangeId,
    price: Decimal,
    volume: Decimal,
    observed_at: DateTime<Utc>,
}

impl PricePoint {
    /// Build a price point, rejecting non-positive prices.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositivePrice`] when `price <= 0`.
    pub fn try_new(
        asset_id: impl Into<AssetId>,
        exchange_id: impl Into<ExchangeId>,
        price: Decimal,
        volume: Decimal,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if price <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { price });
        }
        Ok(Self {
            asset_id: asset_id.into(),
            exchange_id: exchange_id.into(),
            price,
            volume: volume.max(Decimal::ZERO),
            observed_at,
        })
    }

    #[must_use]
    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    #[must_use]
    pub fn exchange_id(&self) -> &ExchangeId {
        &self.exchange_id
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    #[must_use]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}
