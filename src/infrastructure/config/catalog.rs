//! Exchange and asset catalog configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::catalog::{Asset, Catalog, Exchange, DEFAULT_FEE_RATE, DEFAULT_SLIPPAGE_RATE};
use crate::domain::id::{AssetId, ExchangeId};

/// `[catalog]` section.
///
/// Order is significant: users without explicit preferences watch the
/// first entries allowed by their tier.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_slippage")]
    pub default_slippage: Decimal,
    #[serde(default = "default_exchanges")]
    pub exchanges: Vec<Exchange>,
    #[serde(default = "default_assets")]
    pub assets: Vec<Asset>,
}

const fn default_slippage() -> Decimal {
    DEFAULT_SLIPPAGE_RATE
}

fn exchange(id: &str, name: &str) -> Exchange {
    Exchange {
        id: ExchangeId::new(id),
        name: name.into(),
        taker_fee: DEFAULT_FEE_RATE,
        maker_fee: DEFAULT_FEE_RATE,
        enabled: true,
    }
}

fn asset(id: &str, symbol: &str, name: &str) -> Asset {
    Asset {
        id: AssetId::new(id),
        symbol: symbol.into(),
        name: name.into(),
        slippage: None,
        enabled: true,
    }
}

fn default_exchanges() -> Vec<Exchange> {
    vec![
        exchange("binance", "Binance"),
        exchange("gdax", "Coinbase"),
        exchange("kraken", "Kraken"),
        exchange("kucoin", "KuCoin"),
        exchange("gate", "Gate.io"),
        exchange("huobi", "Huobi"),
    ]
}

fn default_assets() -> Vec<Asset> {
    vec![
        asset("bitcoin", "BTC", "Bitcoin"),
        asset("ethereum", "ETH", "Ethereum"),
        asset("binancecoin", "BNB", "BNB"),
        asset("ripple", "XRP", "XRP"),
        asset("cardano", "ADA", "Cardano"),
        asset("solana", "SOL", "Solana"),
        asset("polkadot", "DOT", "Polkadot"),
        asset("dogecoin", "DOGE", "Dogecoin"),
        asset("matic-network", "MATIC", "Polygon"),
        asset("litecoin", "LTC", "Litecoin"),
    ]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_slippage: default_slippage(),
            exchanges: default_exchanges(),
            assets: default_assets(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn to_catalog(&self) -> Catalog {
        Catalog::new(self.exchanges.clone(), self.assets.clone())
            .with_default_slippage(self.default_slippage)
    }
}
