//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors when an invariant
//! would be violated.
//!
//! ```
//! use arbscan::domain::error::DomainError;
//! use arbscan::domain::price::PricePoint;
//! use rust_decimal_macros::dec;
//!
//! let result = PricePoint::try_new("bitcoin", "binance", dec!(0), dec!(1), chrono::Utc::now());
//! assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Observed prices must be strictly positive.
    #[error("price must be positive, got {price}")]
    NonPositivePrice {
        /// The invalid price that was provided.
        price: Decimal,
    },

    /// An opportunity needs the sell side to be above the buy side.
    #[error("sell price {sell} must be greater than buy price {buy}")]
    SellNotAboveBuy { buy: Decimal, sell: Decimal },

    /// Both legs on one exchange is not an arbitrage.
    #[error("buy and sell exchange must differ, both are {exchange}")]
    SameExchange { exchange: String },

    #[error("tier profit at ${investment} must be non-negative, got {profit}")]
    NegativeTierProfit { investment: Decimal, profit: Decimal },

    #[error("unknown notification channel '{0}'")]
    UnknownChannel(String),

    #[error("unknown notification type '{0}'")]
    UnknownNotificationType(String),

    #[error("unknown notification status '{0}'")]
    UnknownStatus(String),
}
