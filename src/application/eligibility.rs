//! Per-user opportunity filtering.

use crate::domain::catalog::Catalog;
use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::opportunity::Opportunity;
use crate::domain::preference::UserNotificationPreference;
use crate::domain::tier::TierTable;

/// Exchanges and assets a user watches after tier defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Watchlist {
    pub exchanges: Vec<ExchangeId>,
    pub assets: Vec<AssetId>,
}

impl Watchlist {
    /// Explicit preferences win. An empty list falls back to the first
    /// enabled catalog entries up to the tier limit.
    #[must_use]
    pub fn resolve(prefs: &UserNotificationPreference, catalog: &Catalog, tiers: &TierTable) -> Self {
        let tier = tiers.resolve(&prefs.tier);
        let exchanges = if prefs.preferred_exchanges.is_empty() {
            catalog.first_exchanges(tier.max_exchanges)
        } else {
            prefs.preferred_exchanges.clone()
        };
        let assets = if prefs.preferred_assets.is_empty() {
            catalog.first_assets(tier.max_assets)
        } else {
            prefs.preferred_assets.clone()
        };
        Self { exchanges, assets }
    }

    #[must_use]
    pub fn covers(&self, opportunity: &Opportunity) -> bool {
        self.exchanges.contains(opportunity.buy_exchange_id())
            && self.exchanges.contains(opportunity.sell_exchange_id())
            && self.assets.contains(opportunity.asset_id())
    }
}

/// Opportunities `prefs` should hear about, in input order.
#[must_use]
pub fn filter_for_user(
    opportunities: &[Opportunity],
    prefs: &UserNotificationPreference,
    catalog: &Catalog,
    tiers: &TierTable,
) -> Vec<Opportunity> {
    let watchlist = Watchlist::resolve(prefs, catalog, tiers);
    opportunities
        .iter()
        .filter(|o| watchlist.covers(o))
        .filter(|o| o.net_profit_percent() >= prefs.min_profit_threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::preference::UserNotificationPreference;
    use crate::testkit::domain::{opportunity, preference, sized_catalog};
    use rust_decimal_macros::dec;

    #[test]
    fn free_tier_defaults_to_first_two_exchanges_and_ten_assets() {
        let catalog = sized_catalog(4, 12);
        let prefs = UserNotificationPreference::new("u1");

        let watchlist = Watchlist::resolve(&prefs, &catalog, &TierTable::default());

        let exchanges: Vec<_> = watchlist.exchanges.iter().map(ExchangeId::as_str).collect();
        assert_eq!(exchanges, ["ex0", "ex1"]);
        assert_eq!(watchlist.assets.len(), 10);
        assert_eq!(watchlist.assets[9].as_str(), "asset9");
    }

    #[test]
    fn default_watchlist_excludes_later_exchanges() {
        let catalog = sized_catalog(4, 12);
        let prefs = UserNotificationPreference::new("u1");
        let opps = [
            opportunity("asset0", "ex0", "ex1", dec!(100), dec!(106)),
            opportunity("asset0", "ex0", "ex2", dec!(100), dec!(106)),
            opportunity("asset11", "ex0", "ex1", dec!(100), dec!(106)),
        ];

        let matched = filter_for_user(&opps, &prefs, &catalog, &TierTable::default());

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].sell_exchange_id().as_str(), "ex1");
    }

    #[test]
    fn unknown_tier_falls_back_to_free() {
        let catalog = sized_catalog(4, 12);
        let mut prefs = UserNotificationPreference::new("u1");
        prefs.tier = "platinum".into();

        let watchlist = Watchlist::resolve(&prefs, &catalog, &TierTable::default());
        assert_eq!(watchlist.exchanges.len(), 2);
    }

    #[test]
    fn enterprise_watches_everything_enabled() {
        let catalog = sized_catalog(4, 30);
        let mut prefs = UserNotificationPreference::new("u1");
        prefs.tier = "enterprise".into();

        let watchlist = Watchlist::resolve(&prefs, &catalog, &TierTable::default());
        assert_eq!(watchlist.exchanges.len(), 4);
        assert_eq!(watchlist.assets.len(), 30);
    }

    #[test]
    fn explicit_preferences_and_threshold_apply() {
        let catalog = sized_catalog(4, 4);
        let mut prefs = preference("u1", &["ex2", "ex3"], &["asset1"]);
        prefs.min_profit_threshold = dec!(7);
        let opps = [
            opportunity("asset1", "ex2", "ex3", dec!(100), dec!(106)),
            opportunity("asset1", "ex3", "ex2", dec!(100), dec!(110)),
            opportunity("asset2", "ex2", "ex3", dec!(100), dec!(110)),
        ];

        let matched = filter_for_user(&opps, &prefs, &catalog, &TierTable::default());

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].buy_exchange_id().as_str(), "ex3");
    }
}
