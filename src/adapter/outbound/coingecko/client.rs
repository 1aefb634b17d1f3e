//! CoinGecko REST client.
//!
//! Fetches `/coins/{id}/tickers` per asset, paced by a [`RateLimiter`] and
//! retried with exponential backoff. Assets that still fail after the last
//! attempt are logged and contribute no price points.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client as HttpClient, StatusCode};
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::dto::{parse_number, Ticker, TickersResponse};
use super::rate_limit::RateLimiter;
use super::settings::CoinGeckoConfig;
use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::price::PricePoint;
use crate::error::PriceSourceError;
use crate::port::outbound::price_source::PriceSource;

const USER_AGENT: &str = concat!("arbscan/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-cg-pro-api-key";

/// HTTP client for the CoinGecko market-data API.
pub struct CoinGeckoClient {
    http: HttpClient,
    config: CoinGeckoConfig,
    limiter: RateLimiter,
}

impl CoinGeckoClient {
    #[must_use]
    pub fn new(config: CoinGeckoConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            limiter: RateLimiter::new(config.min_request_interval()),
            http,
            config,
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.config.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key),
            None => builder,
        }
    }

    /// One paced request for one asset's tickers.
    async fn fetch_tickers_once(&self, asset: &AssetId) -> Result<Vec<Ticker>, PriceSourceError> {
        self.limiter.acquire().await;

        let url = format!(
            "{}/coins/{}/tickers",
            self.config.base_url.trim_end_matches('/'),
            asset
        );
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(PriceSourceError::Transport)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(PriceSourceError::RateLimited),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                return Err(PriceSourceError::NotFound {
                    status: response.status().as_u16(),
                })
            }
            status => {
                return Err(PriceSourceError::Status {
                    status: status.as_u16(),
                })
            }
        }

        let body: TickersResponse = response.json().await.map_err(|err| {
            if err.is_decode() {
                PriceSourceError::Malformed(err.to_string())
            } else {
                PriceSourceError::Transport(err)
            }
        })?;

        body.tickers
            .ok_or_else(|| PriceSourceError::Malformed("response has no tickers".into()))
    }

    /// Fetch with retries. Terminal errors return immediately.
    async fn fetch_tickers(&self, asset: &AssetId) -> Result<Vec<Ticker>, PriceSourceError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match self.fetch_tickers_once(asset).await {
                Ok(tickers) => return Ok(tickers),
                Err(err) => err,
            };

            if attempt >= max_attempts || !err.is_retryable() {
                return Err(err);
            }

            let wait = match &err {
                PriceSourceError::RateLimited => self.config.rate_limit_backoff(attempt),
                _ => self.config.transient_backoff(attempt),
            };
            warn!(
                asset = %asset,
                attempt,
                max_attempts,
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "Price request failed, retrying"
            );
            sleep(wait).await;
        }
    }
}

/// Turn raw tickers into price points.
///
/// Keeps the first acceptable ticker per requested exchange; entries with a
/// missing or non-positive `last` are dropped with a warning.
pub(crate) fn tickers_to_points(
    asset: &AssetId,
    tickers: &[Ticker],
    exchanges: &HashSet<&str>,
    quote_targets: &[String],
    observed_at: DateTime<Utc>,
) -> Vec<PricePoint> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut points = Vec::new();

    for ticker in tickers {
        let Some(exchange) = ticker.exchange_identifier() else {
            continue;
        };
        if !exchanges.contains(exchange) || seen.contains(exchange) {
            continue;
        }
        if !quote_targets.is_empty() {
            let target = ticker.target.as_deref().unwrap_or_default();
            if !quote_targets.iter().any(|q| q.eq_ignore_ascii_case(target)) {
                continue;
            }
        }

        let Some(price) = ticker.last.as_ref().and_then(parse_number) else {
            warn!(asset = %asset, exchange, "Invalid price data, skipping ticker");
            continue;
        };
        let volume = ticker
            .volume
            .as_ref()
            .and_then(parse_number)
            .unwrap_or(Decimal::ZERO);

        match PricePoint::try_new(asset.clone(), exchange, price, volume, observed_at) {
            Ok(point) => {
                seen.insert(exchange);
                points.push(point);
            }
            Err(err) => {
                warn!(asset = %asset, exchange, error = %err, "Rejected price point");
            }
        }
    }

    points
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_prices(&self, assets: &[AssetId], exchanges: &[ExchangeId]) -> Vec<PricePoint> {
        info!(
            assets = assets.len(),
            exchanges = exchanges.len(),
            "Fetching prices"
        );

        let wanted: HashSet<&str> = exchanges.iter().map(ExchangeId::as_str).collect();
        let mut points = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        for asset in assets {
            match self.fetch_tickers(asset).await {
                Ok(tickers) => {
                    let batch = tickers_to_points(
                        asset,
                        &tickers,
                        &wanted,
                        &self.config.quote_targets,
                        Utc::now(),
                    );
                    debug!(asset = %asset, count = batch.len(), "Fetched prices");
                    points.extend(batch);
                }
                Err(PriceSourceError::NotFound { status }) => {
                    warn!(asset = %asset, status, "Asset not found or invalid");
                }
                Err(PriceSourceError::Malformed(reason)) => {
                    warn!(asset = %asset, reason = %reason, "No ticker data");
                }
                Err(err) => {
                    warn!(asset = %asset, error = %err, "Giving up on asset");
                    failed.push(asset.to_string());
                }
            }
        }

        if !failed.is_empty() {
            warn!(count = failed.len(), assets = ?failed, "Assets failed after retries");
        }
        info!(points = points.len(), "Price fetch complete");
        points
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/ping", self.config.base_url.trim_end_matches('/'));
        let result = self
            .request(&url)
            .timeout(Duration::from_millis(self.config.health_timeout_ms))
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Price source health check failed");
                false
            }
            Err(err) => {
                warn!(error = %err, "Price source unreachable");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "coingecko"
    }
}
