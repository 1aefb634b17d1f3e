//! Fee- and slippage-adjusted profit at fixed investment tiers.
//!
//! [`compute`] is pure: it takes two prices and three rates and returns a
//! [`ProfitBreakdown`], or `None` on arithmetic overflow. Rates are
//! fractions (`0.001` = 0.1%); percentages in the breakdown are plain
//! numbers (`5` = 5%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Dollar amounts each opportunity is evaluated at.
pub const INVESTMENT_TIERS: [Decimal; 4] = [dec!(500), dec!(1000), dec!(5000), dec!(10000)];

/// Minimum dollar profit required at each tier, in [`INVESTMENT_TIERS`] order.
pub const MIN_TIER_PROFITS: [Decimal; 4] = [dec!(10), dec!(50), dec!(100), dec!(500)];

/// Floor for the minimum-investment heuristic.
pub const MIN_INVESTMENT_FLOOR: Decimal = dec!(10);

const PERCENT: Decimal = dec!(100);

/// Net dollar profit at each investment tier, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierProfits {
    pub on_500: Decimal,
    pub on_1000: Decimal,
    pub on_5000: Decimal,
    pub on_10000: Decimal,
}

impl TierProfits {
    fn from_array(values: [Decimal; 4]) -> Self {
        Self {
            on_500: values[0],
            on_1000: values[1],
            on_5000: values[2],
            on_10000: values[3],
        }
    }

    #[must_use]
    pub fn as_array(&self) -> [Decimal; 4] {
        [self.on_500, self.on_1000, self.on_5000, self.on_10000]
    }

    /// `(investment, profit)` pairs in ascending investment order.
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, Decimal)> {
        INVESTMENT_TIERS.into_iter().zip(self.as_array())
    }

    /// True when every tier clears its [`MIN_TIER_PROFITS`] bar.
    #[must_use]
    pub fn clears_thresholds(&self) -> bool {
        self.as_array()
            .iter()
            .zip(MIN_TIER_PROFITS.iter())
            .all(|(profit, min)| profit >= min)
    }
}

/// Full cost and profit breakdown of buying on one exchange and selling on
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub buy_fee_rate: Decimal,
    pub sell_fee_rate: Decimal,
    pub slippage_rate: Decimal,
    /// Per-unit fee on the buy leg.
    pub buy_fee: Decimal,
    /// Per-unit fee on the sell leg.
    pub sell_fee: Decimal,
    pub buy_slippage: Decimal,
    pub sell_slippage: Decimal,
    pub raw_price_difference: Decimal,
    pub raw_spread_percent: Decimal,
    pub net_profit_percent: Decimal,
    pub tier_profits: TierProfits,
    pub minimum_investment: Decimal,
}

/// Compute the profit breakdown for buying at `buy_price` and selling at
/// `sell_price`.
///
/// For each tier `T`:
///
/// ```text
/// units     = T / buy
/// buy_cost  = T + T*buy_fee + T*slippage
/// revenue   = units * sell
/// net_sell  = revenue - revenue*sell_fee - revenue*slippage
/// profit    = max(0, net_sell - buy_cost)
/// ```
///
/// A non-positive `buy_price` yields an all-zero result instead of dividing
/// by zero. Returns `None` when any intermediate amount falls outside
/// [`Decimal`]'s range, which happens with extreme price ratios.
#[must_use]
pub fn compute(
    buy_price: Decimal,
    sell_price: Decimal,
    buy_fee_rate: Decimal,
    sell_fee_rate: Decimal,
    slippage_rate: Decimal,
) -> Option<ProfitBreakdown> {
    let raw_price_difference = sell_price.checked_sub(buy_price)?;
    let raw_spread_percent = if buy_price > Decimal::ZERO {
        raw_price_difference
            .checked_div(buy_price)?
            .checked_mul(PERCENT)?
    } else {
        Decimal::ZERO
    };

    let mut tiers = [Decimal::ZERO; 4];
    for (slot, investment) in tiers.iter_mut().zip(INVESTMENT_TIERS) {
        *slot = tier_profit(
            investment,
            buy_price,
            sell_price,
            buy_fee_rate,
            sell_fee_rate,
            slippage_rate,
        )?;
    }

    let minimum_investment = buy_price
        .checked_mul(buy_fee_rate.checked_add(slippage_rate)?)?
        .checked_mul(PERCENT)?
        .max(MIN_INVESTMENT_FLOOR);

    Some(ProfitBreakdown {
        buy_fee_rate,
        sell_fee_rate,
        slippage_rate,
        buy_fee: buy_price.checked_mul(buy_fee_rate)?,
        sell_fee: sell_price.checked_mul(sell_fee_rate)?,
        buy_slippage: buy_price.checked_mul(slippage_rate)?,
        sell_slippage: sell_price.checked_mul(slippage_rate)?,
        raw_price_difference,
        raw_spread_percent,
        net_profit_percent: raw_spread_percent,
        tier_profits: TierProfits::from_array(tiers),
        minimum_investment,
    })
}

fn tier_profit(
    investment: Decimal,
    buy_price: Decimal,
    sell_price: Decimal,
    buy_fee_rate: Decimal,
    sell_fee_rate: Decimal,
    slippage_rate: Decimal,
) -> Option<Decimal> {
    if buy_price <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    let units = investment.checked_div(buy_price)?;
    let buy_cost = investment
        .checked_add(investment.checked_mul(buy_fee_rate)?)?
        .checked_add(investment.checked_mul(slippage_rate)?)?;
    let revenue = units.checked_mul(sell_price)?;
    let net_sell = revenue
        .checked_sub(revenue.checked_mul(sell_fee_rate)?)?
        .checked_sub(revenue.checked_mul(slippage_rate)?)?;
    Some(net_sell.checked_sub(buy_cost)?.max(Decimal::ZERO))
}
