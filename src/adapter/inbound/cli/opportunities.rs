//! Handler for the `opportunities` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::domain::opportunity::Opportunity;
use crate::error::Result;
use crate::port::inbound::operator::port::OperatorPort;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Buy on")]
    buy_exchange: String,
    #[tabled(rename = "Sell on")]
    sell_exchange: String,
    #[tabled(rename = "Buy")]
    buy_price: String,
    #[tabled(rename = "Sell")]
    sell_price: String,
    #[tabled(rename = "Net %")]
    net_percent: String,
    #[tabled(rename = "On $1000")]
    profit_on_1000: String,
    #[tabled(rename = "Detected")]
    detected_at: String,
}

impl From<&Opportunity> for OpportunityRow {
    fn from(opportunity: &Opportunity) -> Self {
        let profit = opportunity.profit();
        Self {
            id: opportunity
                .id()
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            asset: opportunity.asset_symbol().to_string(),
            buy_exchange: opportunity.buy_exchange_id().to_string(),
            sell_exchange: opportunity.sell_exchange_id().to_string(),
            buy_price: opportunity.buy_price().round_dp(6).normalize().to_string(),
            sell_price: opportunity.sell_price().round_dp(6).normalize().to_string(),
            net_percent: format!("{:.2}", profit.net_profit_percent),
            profit_on_1000: format!("${:.2}", profit.tier_profits.on_1000),
            detected_at: opportunity.detected_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// List active opportunities, best net profit first.
pub fn execute(service: &dyn OperatorPort, config_toml: &str, limit: usize) -> Result<()> {
    let opportunities = service.active_opportunities(config_toml, limit)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "opportunities",
            "opportunities": opportunities,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section("Active Opportunities");
    if opportunities.is_empty() {
        output::note("(none)");
        output::hint(&format!(
            "run {} to scan now",
            output::highlight("arbscan scan")
        ));
        return Ok(());
    }

    let rows: Vec<OpportunityRow> = opportunities.iter().map(OpportunityRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::OpportunityId;
    use crate::testkit::domain::opportunity;
    use rust_decimal_macros::dec;

    #[test]
    fn row_formats_prices_and_profit() {
        let opportunity = opportunity("bitcoin", "kraken", "binance", dec!(100), dec!(102))
            .with_id(OpportunityId::new(7));

        let row = OpportunityRow::from(&opportunity);

        assert_eq!(row.id, "7");
        assert_eq!(row.asset, "BITCOIN");
        assert_eq!(row.buy_exchange, "kraken");
        assert_eq!(row.sell_exchange, "binance");
        assert_eq!(row.buy_price, "100");
        assert_eq!(row.sell_price, "102");
        assert!(row.profit_on_1000.starts_with('$'));
    }

    #[test]
    fn unstored_opportunity_has_placeholder_id() {
        let opportunity = opportunity("ethereum", "a", "b", dec!(10), dec!(11));
        assert_eq!(OpportunityRow::from(&opportunity).id, "-");
    }
}
