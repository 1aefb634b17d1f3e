//! Wire types for `GET /coins/{id}/tickers`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TickersResponse {
    /// Absent on some error bodies; treated as terminal.
    #[serde(default)]
    pub tickers: Option<Vec<Ticker>>,
}

#[derive(Debug, Deserialize)]
pub struct Ticker {
    #[serde(default)]
    pub market: Option<TickerMarket>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub last: Option<serde_json::Value>,
    #[serde(default)]
    pub volume: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct TickerMarket {
    #[serde(default)]
    pub identifier: Option<String>,
}

impl Ticker {
    #[must_use]
    pub fn exchange_identifier(&self) -> Option<&str> {
        self.market.as_ref()?.identifier.as_deref()
    }
}

/// Parse a JSON number or numeric string into a finite decimal.
pub fn parse_number(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(|f| Decimal::try_from(f).ok()),
        serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
