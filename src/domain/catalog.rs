//! Exchanges and assets the scanner knows about, with their cost rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::id::{AssetId, ExchangeId};

/// Fee applied when an exchange lists no explicit rate.
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.001);

/// Slippage applied when an asset has no override.
pub const DEFAULT_SLIPPAGE_RATE: Decimal = dec!(0.002);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub name: String,
    /// Charged on the buy leg.
    #[serde(default = "default_fee")]
    pub taker_fee: Decimal,
    /// Charged on the sell leg.
    #[serde(default = "default_fee")]
    pub maker_fee: Decimal,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slippage: Option<Decimal>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

const fn default_fee() -> Decimal {
    DEFAULT_FEE_RATE
}

const fn default_true() -> bool {
    true
}

/// Ordered exchange and asset lists.
///
/// Order matters: it drives detector output order and the default
/// preferred-exchange and preferred-asset selection for users without
/// explicit preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    exchanges: Vec<Exchange>,
    assets: Vec<Asset>,
    default_slippage: Option<Decimal>,
}

impl Catalog {
    #[must_use]
    pub fn new(exchanges: Vec<Exchange>, assets: Vec<Asset>) -> Self {
        Self {
            exchanges,
            assets,
            default_slippage: None,
        }
    }

    #[must_use]
    pub fn with_default_slippage(mut self, slippage: Decimal) -> Self {
        self.default_slippage = Some(slippage);
        self
    }

    pub fn enabled_exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().filter(|e| e.enabled)
    }

    pub fn enabled_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(|a| a.enabled)
    }

    /// Enabled exchange lookup.
    #[must_use]
    pub fn exchange(&self, id: &ExchangeId) -> Option<&Exchange> {
        self.enabled_exchanges().find(|e| &e.id == id)
    }

    /// Enabled asset lookup.
    #[must_use]
    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.enabled_assets().find(|a| &a.id == id)
    }

    /// Fee rate for buying on `exchange`.
    #[must_use]
    pub fn buy_fee(&self, exchange: &ExchangeId) -> Decimal {
        self.exchange(exchange)
            .map_or(DEFAULT_FEE_RATE, |e| e.taker_fee)
    }

    /// Fee rate for selling on `exchange`.
    #[must_use]
    pub fn sell_fee(&self, exchange: &ExchangeId) -> Decimal {
        self.exchange(exchange)
            .map_or(DEFAULT_FEE_RATE, |e| e.maker_fee)
    }

    #[must_use]
    pub fn slippage(&self, asset: &AssetId) -> Decimal {
        let fallback = self.default_slippage.unwrap_or(DEFAULT_SLIPPAGE_RATE);
        self.asset(asset)
            .and_then(|a| a.slippage)
            .unwrap_or(fallback)
    }

    /// First `limit` enabled exchange ids, in catalog order.
    #[must_use]
    pub fn first_exchanges(&self, limit: Option<usize>) -> Vec<ExchangeId> {
        self.enabled_exchanges()
            .take(limit.unwrap_or(usize::MAX))
            .map(|e| e.id.clone())
            .collect()
    }

    /// First `limit` enabled asset ids, in catalog order.
    #[must_use]
    pub fn first_assets(&self, limit: Option<usize>) -> Vec<AssetId> {
        self.enabled_assets()
            .take(limit.unwrap_or(usize::MAX))
            .map(|a| a.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(id: &str, taker: Decimal, maker: Decimal, enabled: bool) -> Exchange {
        Exchange {
            id: ExchangeId::new(id),
            name: id.to_uppercase(),
            taker_fee: taker,
            maker_fee: maker,
            enabled,
        }
    }

    fn asset(id: &str, slippage: Option<Decimal>) -> Asset {
        Asset {
            id: AssetId::new(id),
            symbol: id[..3].to_uppercase(),
            name: id.into(),
            slippage,
            enabled: true,
        }
    }

    #[test]
    fn buy_uses_taker_and_sell_uses_maker() {
        let catalog = Catalog::new(
            vec![exchange("binance", dec!(0.004), dec!(0.002), true)],
            vec![],
        );
        let id = ExchangeId::new("binance");
        assert_eq!(catalog.buy_fee(&id), dec!(0.004));
        assert_eq!(catalog.sell_fee(&id), dec!(0.002));
    }

    #[test]
    fn unknown_exchange_uses_default_fee() {
        let catalog = Catalog::default();
        assert_eq!(catalog.buy_fee(&ExchangeId::new("x")), DEFAULT_FEE_RATE);
    }

    #[test]
    fn slippage_override_then_default() {
        let catalog = Catalog::new(
            vec![],
            vec![asset("bitcoin", Some(dec!(0.005))), asset("ethereum", None)],
        );
        assert_eq!(catalog.slippage(&AssetId::new("bitcoin")), dec!(0.005));
        assert_eq!(catalog.slippage(&AssetId::new("ethereum")), DEFAULT_SLIPPAGE_RATE);

        let custom = catalog.with_default_slippage(dec!(0.003));
        assert_eq!(custom.slippage(&AssetId::new("ethereum")), dec!(0.003));
    }

    #[test]
    fn disabled_exchanges_are_skipped_in_order() {
        let catalog = Catalog::new(
            vec![
                exchange("a", DEFAULT_FEE_RATE, DEFAULT_FEE_RATE, true),
                exchange("b", DEFAULT_FEE_RATE, DEFAULT_FEE_RATE, false),
                exchange("c", DEFAULT_FEE_RATE, DEFAULT_FEE_RATE, true),
            ],
            vec![],
        );
        assert_eq!(
            catalog.first_exchanges(Some(2)),
            vec![ExchangeId::new("a"), ExchangeId::new("c")]
        );
        assert!(catalog.exchange(&ExchangeId::new("b")).is_none());
    }
}
