//! Cross-exchange opportunity detection.
//!
//! For each asset, every ordered pair of exchanges `(buy, sell)` is
//! priced with the catalog's fee and slippage rates. An opportunity is
//! kept only if all four investment tiers clear their minimum profit.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::catalog::Catalog;
use crate::domain::opportunity::Opportunity;
use crate::domain::price::PricePoint;
use crate::domain::profit;

/// Stateless detector over a catalog snapshot.
#[derive(Debug, Clone)]
pub struct OpportunityDetector {
    catalog: Catalog,
}

impl OpportunityDetector {
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Find every profitable buy/sell pair in `points`.
    ///
    /// Output order follows catalog asset order, then buy-side point
    /// order, then sell-side point order. Points for assets not enabled in
    /// the catalog are ignored.
    #[must_use]
    pub fn detect(&self, points: &[PricePoint]) -> Vec<Opportunity> {
        if points.is_empty() {
            warn!("No price points to analyse");
            return Vec::new();
        }

        let detected_at = Utc::now();
        let mut comparisons = 0usize;
        let mut opportunities = Vec::new();

        for asset in self.catalog.enabled_assets() {
            let quotes: Vec<&PricePoint> =
                points.iter().filter(|p| p.asset_id() == &asset.id).collect();
            if quotes.len() < 2 {
                continue;
            }

            let slippage = self.catalog.slippage(&asset.id);

            for buy in &quotes {
                for sell in &quotes {
                    if buy.exchange_id() == sell.exchange_id() {
                        continue;
                    }
                    comparisons += 1;
                    if sell.price() <= buy.price() {
                        continue;
                    }

                    let Some(breakdown) = profit::compute(
                        buy.price(),
                        sell.price(),
                        self.catalog.buy_fee(buy.exchange_id()),
                        self.catalog.sell_fee(sell.exchange_id()),
                        slippage,
                    ) else {
                        warn!(
                            asset = %asset.id,
                            buy = %buy.exchange_id(),
                            sell = %sell.exchange_id(),
                            buy_price = %buy.price(),
                            sell_price = %sell.price(),
                            "Profit calculation overflowed, skipping pair"
                        );
                        continue;
                    };
                    if !breakdown.tier_profits.clears_thresholds() {
                        continue;
                    }

                    match Opportunity::try_new(
                        asset.id.clone(),
                        asset.symbol.clone(),
                        buy.exchange_id().clone(),
                        sell.exchange_id().clone(),
                        buy.price(),
                        sell.price(),
                        breakdown,
                        detected_at,
                    ) {
                        Ok(opportunity) => {
                            debug!(
                                asset = %asset.id,
                                buy = %buy.exchange_id(),
                                sell = %sell.exchange_id(),
                                profit_percent = %breakdown.net_profit_percent,
                                "Opportunity found"
                            );
                            opportunities.push(opportunity);
                        }
                        Err(err) => {
                            warn!(asset = %asset.id, error = %err, "Rejected malformed opportunity");
                        }
                    }
                }
            }
        }

        info!(
            points = points.len(),
            comparisons,
            found = opportunities.len(),
            "Detection complete"
        );
        opportunities
    }
}
