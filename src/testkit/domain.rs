//! Builders for domain primitives used across tests.
//!
//! Fee and slippage defaults match the catalog defaults (0.1% and 0.2%),
//! so a 100 -> 106 spread clears every investment tier.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::catalog::{Asset, Catalog, Exchange, DEFAULT_FEE_RATE};
use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::opportunity::Opportunity;
use crate::domain::preference::UserNotificationPreference;
use crate::domain::price::PricePoint;
use crate::domain::profit::compute;

/// Enabled exchange with the default fee on both legs.
pub fn exchange(id: &str) -> Exchange {
    Exchange {
        id: ExchangeId::new(id),
        name: id.to_string(),
        taker_fee: DEFAULT_FEE_RATE,
        maker_fee: DEFAULT_FEE_RATE,
        enabled: true,
    }
}

/// Enabled asset with no slippage override.
pub fn asset(id: &str, symbol: &str) -> Asset {
    Asset {
        id: AssetId::new(id),
        symbol: symbol.to_string(),
        name: String::new(),
        slippage: None,
        enabled: true,
    }
}

/// Catalog of the given exchange ids and `(asset id, symbol)` pairs.
pub fn catalog(exchanges: &[&str], assets: &[(&str, &str)]) -> Catalog {
    Catalog::new(
        exchanges.iter().map(|id| exchange(id)).collect(),
        assets.iter().map(|(id, symbol)| asset(id, symbol)).collect(),
    )
}

/// Catalog with exchanges `ex0..ex{n}` and assets `asset0..asset{m}`.
pub fn sized_catalog(exchanges: usize, assets: usize) -> Catalog {
    Catalog::new(
        (0..exchanges).map(|i| exchange(&format!("ex{i}"))).collect(),
        (0..assets)
            .map(|i| asset(&format!("asset{i}"), &format!("A{i}")))
            .collect(),
    )
}

/// Price point observed now with unit volume.
pub fn point(asset: &str, exchange: &str, price: Decimal) -> PricePoint {
    PricePoint::try_new(asset, exchange, price, dec!(1), Utc::now())
        .expect("test price must be positive")
}

/// Unstored opportunity priced with default fees and slippage.
pub fn opportunity(
    asset: &str,
    buy: &str,
    sell: &str,
    buy_price: Decimal,
    sell_price: Decimal,
) -> Opportunity {
    let breakdown = compute(
        buy_price,
        sell_price,
        DEFAULT_FEE_RATE,
        DEFAULT_FEE_RATE,
        dec!(0.002),
    )
    .expect("test prices must not overflow");
    Opportunity::try_new(
        AssetId::new(asset),
        asset.to_uppercase(),
        ExchangeId::new(buy),
        ExchangeId::new(sell),
        buy_price,
        sell_price,
        breakdown,
        Utc::now(),
    )
    .expect("test opportunity must satisfy invariants")
}

/// Preferences with explicit exchange and asset lists.
pub fn preference(user: &str, exchanges: &[&str], assets: &[&str]) -> UserNotificationPreference {
    let mut prefs = UserNotificationPreference::new(user);
    prefs.preferred_exchanges = exchanges.iter().map(|id| ExchangeId::new(*id)).collect();
    prefs.preferred_assets = assets.iter().map(|id| AssetId::new(*id)).collect();
    prefs
}
