//! Concrete operator wired against the real adapters.

use std::sync::Arc;

use crate::adapter::outbound::coingecko::client::CoinGeckoClient;
use crate::error::Result;
use crate::infrastructure::bootstrap::App;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::price_source::PriceSource;

/// Implements every operator port for the CLI.
///
/// Prices come from CoinGecko unless a source is injected with
/// [`Operator::with_price_source`].
#[derive(Clone, Default)]
pub struct Operator {
    price_source: Option<Arc<dyn PriceSource>>,
}

impl Operator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `source` instead of CoinGecko for scans and health checks.
    #[must_use]
    pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    pub(super) fn price_source(&self, config: &Config) -> Arc<dyn PriceSource> {
        match &self.price_source {
            Some(source) => Arc::clone(source),
            None => Arc::new(CoinGeckoClient::new(config.price_source.clone())),
        }
    }

    pub(super) fn app(&self, config: Config) -> Result<App> {
        let source = self.price_source(&config);
        App::with_source(config, source)
    }
}
