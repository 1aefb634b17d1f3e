//! Notification content for detected opportunities.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::domain::notification::NotificationType;
use crate::domain::opportunity::Opportunity;
use crate::port::outbound::channel::RenderedNotification;

fn number(value: Decimal) -> Value {
    value.to_f64().map_or(Value::Null, Value::from)
}

/// Title, body and structured payload for an arbitrage alert.
///
/// `total_matches` is how many opportunities matched the user in this
/// scan; only the best one is rendered.
#[must_use]
pub fn render_opportunity(opportunity: &Opportunity, total_matches: usize) -> RenderedNotification {
    let profit = opportunity.profit();
    let tiers = &profit.tier_profits;
    let symbol = opportunity.asset_symbol();

    let title = format!("🚀 New Arbitrage Opportunity: {symbol}");
    let message = format!(
        "💰 Profit opportunity detected!\n\n\
         Asset: {symbol}\n\
         Buy on {buy} → Sell on {sell}\n\
         Price Difference: ${diff:.4}\n\
         Net Profit: {pct:.2}%\n\n\
         Profit Calculator:\n\
         $500 will make ${p500:.2}\n\
         $1,000 will make ${p1000:.2}\n\
         $5,000 will make ${p5000:.2}\n\
         $10,000 will make ${p10000:.2}\n\n\
         ⚠️ Minimum Investment: ${min:.2}",
        buy = opportunity.buy_exchange_id(),
        sell = opportunity.sell_exchange_id(),
        diff = profit.raw_price_difference,
        pct = profit.net_profit_percent,
        p500 = tiers.on_500,
        p1000 = tiers.on_1000,
        p5000 = tiers.on_5000,
        p10000 = tiers.on_10000,
        min = profit.minimum_investment,
    );

    let payload = json!({
        "opportunity": {
            "id": opportunity.id().map(|id| id.value()),
            "token_symbol": symbol,
            "asset_id": opportunity.asset_id().as_str(),
            "buy_exchange": opportunity.buy_exchange_id().as_str(),
            "sell_exchange": opportunity.sell_exchange_id().as_str(),
            "buy_price": number(opportunity.buy_price()),
            "sell_price": number(opportunity.sell_price()),
            "detected_at": opportunity.detected_at().to_rfc3339(),
        },
        "profit_percent": number(profit.net_profit_percent),
        "raw_price_difference": number(profit.raw_price_difference),
        "profit_on_500": number(tiers.on_500),
        "profit_on_1000": number(tiers.on_1000),
        "profit_on_5000": number(tiers.on_5000),
        "profit_on_10000": number(tiers.on_10000),
        "min_investment_required": number(profit.minimum_investment),
        "total_opportunities": total_matches,
    });

    RenderedNotification {
        kind: NotificationType::ArbitrageOpportunity,
        title,
        message,
        payload,
    }
}
