//! Market-data port.

use async_trait::async_trait;

use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::price::PricePoint;

/// Source of last-traded prices across exchanges.
///
/// Implementations absorb transient failures themselves: an asset whose
/// fetch keeps failing simply contributes no points.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current prices for every `(asset, exchange)` pair the source can
    /// see. Entries for exchanges outside `exchanges` are discarded.
    async fn fetch_prices(&self, assets: &[AssetId], exchanges: &[ExchangeId]) -> Vec<PricePoint>;

    /// Cheap reachability check.
    async fn health_check(&self) -> bool;

    /// Human-readable source name for logs.
    fn name(&self) -> &'static str;
}
