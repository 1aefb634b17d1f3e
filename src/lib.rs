//! arbscan - cross-exchange crypto arbitrage scanner.
//!
//! Periodically pulls last-traded prices for a catalog of assets across
//! centralized exchanges, finds buy-low/sell-high pairs whose spread still
//! pays after fees and slippage, stores them, and alerts subscribed users
//! through in-app, email, Telegram and WhatsApp channels.
//!
//! # Architecture
//!
//! Hexagonal: the pipeline in [`application`] depends only on [`domain`]
//! types and the traits in [`port`]; [`adapter`] holds the CoinGecko
//! client, the SQLite and in-memory stores, the channel senders and the
//! CLI; [`infrastructure`] wires them together from configuration and
//! implements the operator ports the CLI drives.
//!
//! # Features
//!
//! - `telegram` (default) - Telegram delivery via `teloxide`
//! - `testkit` - scripted price source, recording sender and builders
//!
//! # Example
//!
//! ```no_run
//! use arbscan::infrastructure::bootstrap::App;
//! use arbscan::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> arbscan::error::Result<()> {
//! let config = Config::load("arbscan.toml")?;
//! let app = App::build(config)?;
//! let report = app.scanner.scan_now().await?;
//! println!("{} opportunities stored", report.opportunities_stored);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
